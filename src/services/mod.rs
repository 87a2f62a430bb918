pub mod asset_service;
