use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("no inverse for planar point ({0}, {1})")]
    NoInverse(f64, f64),

    #[error("point ({0}, {1}) projects outside both clip regions")]
    OutsideClipRegion(f64, f64),

    #[error("cannot fit: object has empty projected bounds")]
    EmptyBounds,
}
