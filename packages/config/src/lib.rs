// ABOUTME: Shared configuration surface for modwatch packages
// ABOUTME: Environment variable names, Destiny catalog constants, and Bungie endpoint paths

pub mod constants;
pub mod destiny;

pub use destiny::BungieEndpoints;
