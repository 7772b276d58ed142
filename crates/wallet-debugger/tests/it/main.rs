
mod discovery;
mod sign_in;
