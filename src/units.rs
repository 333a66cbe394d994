//! Units of the measured values, so that statistics carry the unit in
//! their type (works with the `stats` module).

use std::fmt::Display;

/// The unit as shown in table titles and axis descriptions.
pub trait UnitShort {
    const UNIT_SHORT: &'static str;
}

macro_rules! define_unit {
    { $T:ident, $unit_short:tt } => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $T(pub f64);

        impl UnitShort for $T {
            const UNIT_SHORT: &'static str = $unit_short;
        }

        impl From<$T> for f64 {
            fn from(value: $T) -> f64 {
                value.0
            }
        }

        impl From<f64> for $T {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl Display for $T {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_short)
            }
        }
    }
}

define_unit!(MicroSeconds, "us");
define_unit!(MilliSeconds, "ms");
define_unit!(RequestsPerSecond, "req/s");

impl MicroSeconds {
    pub fn to_millis(self) -> MilliSeconds {
        MilliSeconds(self.0 / 1000.)
    }
}
