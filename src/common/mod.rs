mod fs;

pub(crate) use fs::*;
