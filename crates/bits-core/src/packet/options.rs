use serde::{Deserialize, Serialize};

/// Default ceiling on operator nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Highest nesting ceiling a caller may configure. Decoding recurses once per
/// level, so larger values are clamped to keep the stack bounded.
pub const MAX_DEPTH_CEILING: usize = 512;

/// How the decoder treats malformed or truncated input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Zero-fill bad digits, accept short reads, keep partial operators.
    /// Every correction is recorded as an [`Anomaly`](super::Anomaly).
    #[default]
    Lenient,
    /// Fail on the first malformed digit, short read or truncated operator.
    Strict,
}

/// Decoder configuration.
///
/// # Examples
/// ```
/// use bits_core::{DecodeOptions, DecodePolicy};
///
/// let options = DecodeOptions::default();
/// assert_eq!(options.policy, DecodePolicy::Lenient);
/// assert_eq!(options.max_depth, bits_core::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub policy: DecodePolicy,
    /// Deepest allowed nesting; top-level packets sit at depth 0. The decoder
    /// never honors more than [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            policy: DecodePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            policy: DecodePolicy::Strict,
            ..Self::default()
        }
    }

    /// Set the nesting ceiling, clamped to [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    /// Same options with the nesting ceiling clamped.
    pub fn clamped(self) -> Self {
        self.with_max_depth(self.max_depth)
    }

    pub fn is_strict(&self) -> bool {
        self.policy == DecodePolicy::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_DEPTH, DecodeOptions, MAX_DEPTH_CEILING};

    #[test]
    fn max_depth_is_clamped_to_ceiling() {
        let options = DecodeOptions::default().with_max_depth(1_000_000);
        assert_eq!(options.max_depth, MAX_DEPTH_CEILING);

        let raw = DecodeOptions {
            max_depth: usize::MAX,
            ..DecodeOptions::default()
        };
        assert_eq!(raw.clamped().max_depth, MAX_DEPTH_CEILING);
        assert_eq!(DecodeOptions::default().clamped().max_depth, DEFAULT_MAX_DEPTH);
    }
}
