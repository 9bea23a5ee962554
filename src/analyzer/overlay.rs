use image::{Rgba, RgbaImage};

use crate::core::video::frame::Frame;
use crate::core::video::io::{Annotation, AnnotationColor};

const BOX_THICKNESS: i32 = 2;

fn color_pixel(color: AnnotationColor) -> Rgba<u8> {
    match color {
        AnnotationColor::Green => Rgba([0, 255, 0, 255]),
        AnnotationColor::Orange => Rgba([255, 165, 0, 255]),
        AnnotationColor::Red => Rgba([255, 0, 0, 255]),
    }
}

/// Burns the bounding box into the frame's pixels, clipped to frame bounds.
/// The status label itself travels with the annotation descriptor to the
/// encoder, which owns text rendering.
pub fn draw_annotation(frame: &mut Frame, annotation: &Annotation) {
    if frame.data.len() != frame.pixel_count() * 4 {
        return;
    }
    let data = std::mem::take(&mut frame.data);
    let Some(mut img) = RgbaImage::from_raw(frame.width, frame.height, data) else {
        return;
    };

    let pixel = color_pixel(annotation.color);
    let bbox = annotation.bbox;
    for t in 0..BOX_THICKNESS {
        draw_hline(&mut img, bbox.x1, bbox.x2, bbox.y1 + t, pixel);
        draw_hline(&mut img, bbox.x1, bbox.x2, bbox.y2 - t, pixel);
        draw_vline(&mut img, bbox.y1, bbox.y2, bbox.x1 + t, pixel);
        draw_vline(&mut img, bbox.y1, bbox.y2, bbox.x2 - t, pixel);
    }

    frame.data = img.into_raw();
}

fn draw_hline(img: &mut RgbaImage, x1: i32, x2: i32, y: i32, pixel: Rgba<u8>) {
    if y < 0 || y >= img.height() as i32 {
        return;
    }
    let x_start = x1.max(0);
    let x_end = x2.min(img.width() as i32 - 1);
    for x in x_start..=x_end {
        img.put_pixel(x as u32, y as u32, pixel);
    }
}

fn draw_vline(img: &mut RgbaImage, y1: i32, y2: i32, x: i32, pixel: Rgba<u8>) {
    if x < 0 || x >= img.width() as i32 {
        return;
    }
    let y_start = y1.max(0);
    let y_end = y2.min(img.height() as i32 - 1);
    for y in y_start..=y_end {
        img.put_pixel(x as u32, y as u32, pixel);
    }
}
