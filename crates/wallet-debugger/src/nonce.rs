use parking_lot::Mutex;
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

/// Upper bound (exclusive) of debug nonces.
pub const DEBUG_NONCE_RANGE: u32 = 1_000_000;

/// Length of secure nonces.
pub const SECURE_NONCE_LEN: usize = 17;

/// How sign-in nonces are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    /// A random integer below one million, in decimal. Low entropy.
    #[default]
    Debug,
    /// Alphanumeric string drawn from the thread-local CSPRNG.
    Secure,
}

impl FromStr for NonceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "secure" => Ok(Self::Secure),
            other => Err(format!("unknown nonce mode `{other}`, expected debug or secure")),
        }
    }
}

impl fmt::Display for NonceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Secure => "secure",
        })
    }
}

/// Produces nonces that are unique within one debugger session.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    mode: NonceMode,
    issued: Mutex<HashSet<String>>,
}

impl NonceGenerator {
    pub fn new(mode: NonceMode) -> Self {
        Self { mode, issued: Mutex::default() }
    }

    pub fn mode(&self) -> NonceMode {
        self.mode
    }

    /// Draws a nonce that has not been handed out before by this generator.
    pub fn generate(&self) -> String {
        let mut issued = self.issued.lock();
        loop {
            let nonce = self.draw();
            if issued.insert(nonce.clone()) {
                return nonce;
            }
            trace!(%nonce, "nonce collision, drawing again");
        }
    }

    fn draw(&self) -> String {
        let mut rng = rand::rng();
        match self.mode {
            NonceMode::Debug => rng.random_range(0..DEBUG_NONCE_RANGE).to_string(),
            NonceMode::Secure => {
                (&mut rng).sample_iter(Alphanumeric).take(SECURE_NONCE_LEN).map(char::from).collect()
            }
        }
    }
}
