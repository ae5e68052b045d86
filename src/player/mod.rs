pub mod controller;

#[cfg(test)]
mod controller_test;
#[cfg(test)]
pub(crate) mod fake_mixer;

pub use controller::PlayerController;
