use core::fmt;

/// Signal quality grade based on the signal percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent, // >= 85%
    Good,      // >= 70%
    Fair,      // >= 50%
    Poor,      // >= 30%
    VeryPoor,  // < 30%
}

impl SignalQuality {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            85..=u8::MAX => SignalQuality::Excellent,
            70..=84 => SignalQuality::Good,
            50..=69 => SignalQuality::Fair,
            30..=49 => SignalQuality::Poor,
            _ => SignalQuality::VeryPoor,
        }
    }

    /// Short marker used in front of the grade in text reports
    pub fn marker(&self) -> &'static str {
        match self {
            SignalQuality::Excellent | SignalQuality::Good => "[+]",
            SignalQuality::Fair => "[~]",
            SignalQuality::Poor => "[-]",
            SignalQuality::VeryPoor => "[!]",
        }
    }

    /// Rough distance to the access point implied by the grade
    pub fn proximity(&self) -> &'static str {
        match self {
            SignalQuality::Excellent => "Very close",
            SignalQuality::Good => "Close proximity",
            SignalQuality::Fair => "Medium distance",
            SignalQuality::Poor => "Far distance",
            SignalQuality::VeryPoor => "Very far",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalQuality::Excellent => write!(f, "Excellent"),
            SignalQuality::Good => write!(f, "Good"),
            SignalQuality::Fair => write!(f, "Fair"),
            SignalQuality::Poor => write!(f, "Poor"),
            SignalQuality::VeryPoor => write!(f, "Very Poor"),
        }
    }
}
