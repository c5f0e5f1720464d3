//! Fit helpers: rescale and recenter the composite so an object's projected
//! bounds fill a target rectangle.
//!
//! Bounds are measured at a fixed base configuration (scale 150, origin
//! translation) through the composite's own stream, so per-half clip windows
//! participate in the measurement exactly as they do in rendering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ProjError;
use crate::geometry::Geometry;
use crate::spain::ConicConformalSpain;
use crate::stream::{BoundsStream, SharedStream};

const BASE_SCALE: f64 = 150.0;

fn projected_bounds(
    projection: &mut ConicConformalSpain,
    object: &Geometry,
) -> Result<((f64, f64), (f64, f64)), ProjError> {
    projection.set_scale(BASE_SCALE);
    projection.set_translate((0.0, 0.0));
    let bounds = Rc::new(RefCell::new(BoundsStream::default()));
    let sink: SharedStream = bounds.clone();
    let stream = projection.stream(&sink);
    object.stream_to(&mut *stream.borrow_mut());
    let result = bounds.borrow().result().ok_or(ProjError::EmptyBounds)?;
    Ok(result)
}

pub(crate) fn fit_extent(
    projection: &mut ConicConformalSpain,
    extent: [(f64, f64); 2],
    object: &Geometry,
) -> Result<(), ProjError> {
    let ((bx0, by0), (bx1, by1)) = projected_bounds(projection, object)?;
    let w = extent[1].0 - extent[0].0;
    let h = extent[1].1 - extent[0].1;
    let bw = bx1 - bx0;
    let bh = by1 - by0;
    if bw <= 0.0 || bh <= 0.0 {
        return Err(ProjError::EmptyBounds);
    }
    let k = (w / bw).min(h / bh);
    let x = extent[0].0 + (w - k * (bx1 + bx0)) / 2.0;
    let y = extent[0].1 + (h - k * (by1 + by0)) / 2.0;
    projection.set_scale(BASE_SCALE * k);
    projection.set_translate((x, y));
    Ok(())
}

pub(crate) fn fit_size(
    projection: &mut ConicConformalSpain,
    size: (f64, f64),
    object: &Geometry,
) -> Result<(), ProjError> {
    fit_extent(projection, [(0.0, 0.0), size], object)
}

pub(crate) fn fit_width(
    projection: &mut ConicConformalSpain,
    width: f64,
    object: &Geometry,
) -> Result<(), ProjError> {
    let ((bx0, by0), (bx1, _)) = projected_bounds(projection, object)?;
    let bw = bx1 - bx0;
    if bw <= 0.0 {
        return Err(ProjError::EmptyBounds);
    }
    let k = width / bw;
    let x = (width - k * (bx1 + bx0)) / 2.0;
    let y = -k * by0;
    projection.set_scale(BASE_SCALE * k);
    projection.set_translate((x, y));
    Ok(())
}

pub(crate) fn fit_height(
    projection: &mut ConicConformalSpain,
    height: f64,
    object: &Geometry,
) -> Result<(), ProjError> {
    let ((bx0, by0), (_, by1)) = projected_bounds(projection, object)?;
    let bh = by1 - by0;
    if bh <= 0.0 {
        return Err(ProjError::EmptyBounds);
    }
    let k = height / bh;
    let x = -k * bx0;
    let y = (height - k * (by1 + by0)) / 2.0;
    projection.set_scale(BASE_SCALE * k);
    projection.set_translate((x, y));
    Ok(())
}
