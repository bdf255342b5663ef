use core::fmt;

pub const DEFAULT_BASE_DURATION_SECS: u32 = 3;
pub const DEFAULT_MONITOR_DURATION_SECS: u32 = 5;
pub const MAX_DURATION_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Average all samples of the run into one record
    Base,
    /// Report every sample of the run
    Monitor,
}

impl RunMode {
    pub fn default_duration(&self) -> u32 {
        match self {
            RunMode::Base => DEFAULT_BASE_DURATION_SECS,
            RunMode::Monitor => DEFAULT_MONITOR_DURATION_SECS,
        }
    }

    /// Match the mode keyword on its first four letters, ignoring case
    fn from_keyword(word: &str) -> Option<Self> {
        let prefix = word.as_bytes().get(..4)?;

        if prefix.eq_ignore_ascii_case(b"base") {
            Some(RunMode::Base)
        } else if prefix.eq_ignore_ascii_case(b"moni") {
            Some(RunMode::Monitor)
        } else {
            None
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunMode::Base => write!(f, "base"),
            RunMode::Monitor => write!(f, "monitor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub mode: RunMode,
    pub duration_secs: u32,
    /// Informational message when the request had to be corrected
    pub notice: Option<String>,
}

impl RunRequest {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            duration_secs: mode.default_duration(),
            notice: None,
        }
    }

    /// Parse a request, falling back to defaults instead of failing.
    ///
    /// An empty request selects monitor mode silently. An unknown mode
    /// keyword selects monitor mode with a notice. A duration outside
    /// `1..=60` is replaced by the mode default with a notice. A missing or
    /// non-numeric duration selects the default silently.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::new(RunMode::Monitor);
        }

        let (keyword, rest) = match input.find(char::is_whitespace) {
            Some(i) => (&input[..i], &input[i..]),
            None => (input, ""),
        };

        let Some(mode) = RunMode::from_keyword(keyword) else {
            let mut request = Self::new(RunMode::Monitor);
            request.notice = Some("No valid mode specified, using default: monitor mode".into());
            return request;
        };

        let mut request = Self::new(mode);

        if let Some(duration) = leading_number(rest.trim_start()) {
            match u32::try_from(duration) {
                Ok(secs) if (1..=MAX_DURATION_SECS).contains(&secs) => {
                    request.duration_secs = secs;
                }
                _ => {
                    request.notice = Some(format!(
                        "Invalid duration, using default: {} seconds",
                        mode.default_duration()
                    ));
                }
            }
        }

        request
    }
}

/// Value of the leading run of ASCII digits, saturating on overflow
fn leading_number(text: &str) -> Option<u64> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());

    if end == 0 {
        return None;
    }

    Some(text.as_bytes()[..end].iter().fold(0u64, |acc, digit| {
        acc.saturating_mul(10).saturating_add((digit - b'0') as u64)
    }))
}
