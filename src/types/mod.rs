mod district_id;

pub use district_id::{DistrictCodeRule, DistrictId};
