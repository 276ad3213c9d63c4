use std::fmt;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Numeric district key shared by the statistics table and the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictId(pub u32);

impl DistrictId {
    #[inline] pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DistrictId {
    fn from(value: u32) -> Self { Self(value) }
}

/// Fixed character window that turns a composite district code into a `DistrictId`.
///
/// Vienna codes look like `90100`: the leading `9` is the state, the next two digits are the
/// district and the trailing digits are a sub-district. The default rule reads `01` out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictCodeRule {
    pub offset: usize,
    pub width: usize,
}

impl DistrictCodeRule {
    /// Two digits after the state prefix, matching the `BEZNR` boundary property (1..=23).
    pub const VIENNA: Self = Self { offset: 1, width: 2 };

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0, "[district_code] width must be at least 1");
        ensure!(self.width <= 9, "[district_code] width {} does not fit a u32 district id", self.width);
        Ok(())
    }

    /// Extract the district id, or `None` if the window is out of range or not all digits.
    pub fn extract(&self, code: &str) -> Option<DistrictId> {
        let code = code.trim();
        let window = code.get(self.offset..self.offset.checked_add(self.width)?)?;
        if !window.bytes().all(|b| b.is_ascii_digit()) { return None }
        window.parse().ok().map(DistrictId)
    }
}

impl Default for DistrictCodeRule {
    fn default() -> Self { Self::VIENNA }
}
