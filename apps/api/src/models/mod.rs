pub mod meal;
pub mod selection;
pub mod settings;
