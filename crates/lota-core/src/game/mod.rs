pub mod outcome;
pub mod trial;
