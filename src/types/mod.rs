pub mod centroid;
pub mod merged_record;
pub mod season;
pub mod weather_variable;
