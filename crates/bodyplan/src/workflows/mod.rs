pub mod consultation;
pub mod rules_import;
