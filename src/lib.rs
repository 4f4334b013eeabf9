pub mod analysis;
pub mod config;
pub mod consts;
pub mod error;
pub mod event;
pub mod histogram;
pub mod kinematics;
pub mod pairing;
pub mod plot;
pub mod sample;
pub mod selection;
pub mod toy;
pub mod weight;
// cmd and reports are binary modules (see main.rs).
