pub mod catalogue_service;
