pub(crate) mod contract;
pub(crate) mod dependency;
