//! Declarative macros for reducing score type boilerplate.
//!
//! These macros generate the repetitive trait implementations that all
//! field-based score types share: ordering, arithmetic ops,
//! multiply/divide, and slash-separated parsing. Every generated impl
//! threads the leading `init_score` through alongside the level fields.

/// Generates `Ord`, `PartialOrd`, `Add`, `Sub`, and `Neg` for a field-based score type.
///
/// Fields are compared in the order they are listed, after `init_score`.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft });
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ }) => {
        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.init_score
                    .cmp(&other.init_score)
                    $(.then_with(|| self.$field.cmp(&other.$field)))+
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type {
                    init_score: self.init_score + other.init_score,
                    $($field: self.$field + other.$field),+
                }
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type {
                    init_score: self.init_score - other.init_score,
                    $($field: self.$field - other.$field),+
                }
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type {
                    init_score: -self.init_score,
                    $($field: -self.$field),+
                }
            }
        }
    };
}

/// Generates `init_score`, `with_init_score`, `multiply`, `divide`, and `abs`
/// for the `Score` trait impl.
///
/// Intended to be used *inside* an `impl Score for Type { ... }` block.
///
/// # Usage
/// ```ignore
/// impl Score for HardSoftScore {
///     // ...other methods...
///     impl_score_scale!(HardSoftScore { hard, soft });
/// }
/// ```
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ }) => {
        #[inline]
        fn init_score(&self) -> i32 {
            self.init_score
        }

        fn with_init_score(&self, init_score: i32) -> Self {
            $type { init_score, ..*self }
        }

        fn multiply(&self, multiplicand: f64) -> Self {
            $type {
                init_score: (self.init_score as f64 * multiplicand).floor() as i32,
                $($field: (self.$field as f64 * multiplicand).round() as i64),+
            }
        }

        fn divide(&self, divisor: f64) -> Self {
            $type {
                init_score: (self.init_score as f64 / divisor).floor() as i32,
                $($field: (self.$field as f64 / divisor).round() as i64),+
            }
        }

        fn abs(&self) -> Self {
            $type {
                init_score: self.init_score.abs(),
                $($field: self.$field.abs()),+
            }
        }
    };
}

/// Generates `ParseableScore` for scores using the `"[Ninit/]Xsuffix/Ysuffix"` format.
///
/// Each field maps to a suffix label (e.g., `hard => "hard"`). An empty
/// suffix means a bare number. All values are parsed as `i64`.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" });
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ }) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let (init_score, rest) = $crate::score::traits::split_init_score(s)?;
                let parts: Vec<&str> = rest.split('/').collect();
                let suffixes: &[&str] = &[ $($suffix),+ ];
                let count = suffixes.len();

                if parts.len() != count {
                    return Err($crate::score::traits::ScoreParseError {
                        message: format!(
                            "Invalid {} format '{}': expected {} parts separated by '/'",
                            stringify!($type), s.trim(), count
                        ),
                    });
                }

                let mut _idx = 0usize;
                $(
                    let $field = {
                        let part = parts[_idx].trim();
                        let num_str = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError {
                                message: format!(
                                    "{} part '{}' must end with '{}'",
                                    stringify!($field), part, $suffix
                                ),
                            }
                        })?;
                        let val = num_str.parse::<i64>().map_err(|e| {
                            $crate::score::traits::ScoreParseError {
                                message: format!(
                                    "Invalid {} score '{}': {}",
                                    stringify!($field), num_str, e
                                ),
                            }
                        })?;
                        _idx += 1;
                        val
                    };
                )+

                Ok($type { init_score, $($field),+ })
            }

            fn to_string_repr(&self) -> String {
                self.to_string()
            }
        }
    };
}
