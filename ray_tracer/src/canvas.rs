use crate::color::Color;

const MAX_PIXEL_VALUE: u8 = 255;
const MAX_LINE_LEN: usize = 70;

/// A grid of colors stored row by row.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Vec<Color>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![vec![Color::BLACK; width]; height],
        }
    }

    /// Builds a canvas from already rendered rows, all of which must have the same length.
    pub(crate) fn from_rows(width: usize, rows: Vec<Vec<Color>>) -> Self {
        Self {
            width,
            height: rows.len(),
            pixels: rows,
        }
    }

    /// Panics if x or y are outside the canvas.
    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        self.pixels[y][x]
    }

    /// Panics if x or y are outside the canvas.
    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y][x] = color;
    }

    /// Serializes the canvas as a plain (P3) PPM image.
    pub fn to_ppm(&self) -> String {
        let mut ppm = format!("P3\n{} {}\n{}\n", self.width, self.height, MAX_PIXEL_VALUE);

        for row in &self.pixels {
            let mut line = String::new();
            let channels = row
                .iter()
                .flat_map(|pixel| [pixel.red, pixel.green, pixel.blue]);
            for channel in channels {
                let value = scale_and_clamp(channel).to_string();
                if line.len() + value.len() + 1 > MAX_LINE_LEN {
                    ppm.push_str(&line);
                    ppm.push('\n');
                    line.clear();
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }
            ppm.push_str(&line);
            ppm.push('\n');
        }

        ppm
    }
}

/// Scales to 0-255; the float to int cast saturates at both ends.
fn scale_and_clamp(val: f64) -> u8 {
    (val * MAX_PIXEL_VALUE as f64).round() as u8
}
