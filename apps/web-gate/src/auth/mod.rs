pub mod collaborators;
pub mod gate;
