pub mod db;
pub mod entities;
pub mod password;
pub mod services;
