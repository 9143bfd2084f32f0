pub mod dataset_source;
