use serde::{Deserialize, Serialize};

/*
    form x-www-form-urlencoded inviati dal frontend.
    I campi mancanti valgono "" (come un form HTML vuoto), quindi niente rejection in fase di parsing:
    la validazione la fa lo store.
*/
// Signup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Signin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
}
