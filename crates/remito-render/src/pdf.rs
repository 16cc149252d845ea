//! PDF painter: replays a [`DocumentLayout`] onto printpdf pages.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Polygon, Pt, Rgb,
};

use crate::error::{RenderError, RenderResult};
use crate::layout::{Color, DocumentLayout, Element, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::metrics::Face;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }
}

/// Paints every page and returns the PDF bytes.
pub(crate) fn paint(layout: &DocumentLayout, title: &str) -> RenderResult<Vec<u8>> {
    let width = Mm::from(Pt(PAGE_WIDTH));
    let height = Mm::from(Pt(PAGE_HEIGHT));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Page 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", index + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        paint_page(&layer, page, &fonts);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn paint_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts) {
    for element in &page.elements {
        match element {
            Element::Text(run) => {
                layer.set_fill_color(pdf_color(run.color));
                layer.use_text(
                    run.text.as_str(),
                    run.size,
                    pt(run.x),
                    pt(run.y),
                    fonts.get(run.face),
                );
            }

            Element::Stroke {
                points,
                closed,
                width,
                color,
            } => {
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(*width);
                layer.add_line(Line {
                    points: points.iter().map(|&(x, y)| (point(x, y), false)).collect(),
                    is_closed: *closed,
                });
            }

            Element::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                layer.set_fill_color(pdf_color(*color));
                layer.add_polygon(Polygon {
                    rings: vec![vec![
                        (point(*x, *y), false),
                        (point(x + width, *y), false),
                        (point(x + width, y + height), false),
                        (point(*x, y + height), false),
                    ]],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
        }
    }
}

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

fn point(x: f32, y: f32) -> Point {
    Point::new(pt(x), pt(y))
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(color.r, color.g, color.b, None))
}
