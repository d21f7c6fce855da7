pub mod alphabet;
pub mod cursor;
pub mod device;
pub mod dump;
pub mod error;
pub mod interpreter;
pub mod scanner;
pub mod tape;
pub mod validator;
