pub mod domain;
pub mod ports;
pub mod validation;

pub use domain::{AuthSession, NewSelection, Selection, SelectionChanges, User, UserCredentials};
pub use ports::{AccountStore, PortError, PortResult, SelectionStore};
pub use validation::{validate_changes, validate_new_selection, ValidationErrors};
