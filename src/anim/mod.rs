/// Movement and scale oscillators.
pub mod oscillator;
