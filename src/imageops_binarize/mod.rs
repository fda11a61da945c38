pub mod global_threshold;
pub mod histogram;
pub mod local_contrast;
pub mod local_statistical;
pub mod remap;
pub mod summed_area_table;
pub mod transform;
pub mod window_statistics;
