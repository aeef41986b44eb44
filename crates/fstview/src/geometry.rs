use std::fmt;

/// A position in the solver's normalized unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Pixel canvas the unit square is mapped onto.
///
/// The y-axis is inverted: solver y=1 lands on the top margin, y=0 on the
/// bottom margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
    pub margin: i32,
}

impl Canvas {
    pub const REPORT: Canvas = Canvas {
        width: 800,
        height: 600,
        margin: 50,
    };

    /// Map a unit-square point to pixel coordinates, truncating toward zero.
    pub fn scale(&self, p: Point) -> (i32, i32) {
        let inner_w = f64::from(self.width - 2 * self.margin);
        let inner_h = f64::from(self.height - 2 * self.margin);
        let x = self.margin + (p.x * inner_w) as i32;
        let y = self.margin + ((1.0 - p.y) * inner_h) as i32;
        (x, y)
    }
}

/// Five-band classification of a terminal's battery charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryBand {
    Full,
    High,
    Medium,
    Low,
    Critical,
}

impl BatteryBand {
    pub fn from_level(level: f64) -> Self {
        if level >= 80.0 {
            Self::Full
        } else if level >= 60.0 {
            Self::High
        } else if level >= 40.0 {
            Self::Medium
        } else if level >= 20.0 {
            Self::Low
        } else {
            Self::Critical
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Full => "#27ae60",
            Self::High => "#52c41a",
            Self::Medium => "#f39c12",
            Self::Low => "#e67e22",
            Self::Critical => "#e74c3c",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "80-100%",
            Self::High => "60-80%",
            Self::Medium => "40-60%",
            Self::Low => "20-40%",
            Self::Critical => "below 20%",
        }
    }

    pub fn all() -> &'static [BatteryBand] {
        &[
            BatteryBand::Full,
            BatteryBand::High,
            BatteryBand::Medium,
            BatteryBand::Low,
            BatteryBand::Critical,
        ]
    }
}

/// Fill colour for a battery level.
pub fn battery_color(level: f64) -> &'static str {
    BatteryBand::from_level(level).color()
}
