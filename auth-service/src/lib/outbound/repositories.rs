pub mod principal;

pub use principal::PostgresPrincipalRepository;
