pub mod forgetting;
