pub mod home;
pub mod run;
