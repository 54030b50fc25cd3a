pub mod base_types;
pub mod config;
pub mod json_serialisation;
pub mod requests;
pub mod road_network;
pub mod validation;
pub mod vehicles;
