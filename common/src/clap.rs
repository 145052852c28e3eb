use std::{
    fmt::{self, Display},
    marker::PhantomData,
    ops::Deref,
    str::FromStr,
};

use clap::Args;

/// AWS configuration used when talking to an S3 compatible gateway.
#[derive(Args, Clone, Debug)]
pub struct AwsConfig {
    /// AWS region. The Ceph gateway accepts any region, `us-east-1` is the conventional one.
    #[clap(
        name = "aws-region",
        long,
        env = "AWS_REGION",
        global = true,
        default_value = "us-east-1"
    )]
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
        }
    }
}

//
// Secrets redaction
// It is nice to be able to debug print our CLI arguments on startup as this can save a lot of
// time when investigating an issue. Some of our CLI arguments are secrets though, so we want a way
// of hiding those values from `Debug` calls without introducing overheads in the developer experience.
//
// For this we have `CliSecret` and `RedactionFunction` which you can wrap around values which will modify
// debug print output.
//

pub trait RedactionFunction<T> {
    fn redact(s: &T) -> String;
}

const REDACTED_VALUE: &str = "<REDACTED>";

#[derive(Clone)]
pub struct PlainRedactor {}

impl<T> RedactionFunction<T> for PlainRedactor {
    fn redact(_: &T) -> String {
        REDACTED_VALUE.to_string()
    }
}

/// Keeps the first few characters of a key visible, which is enough to tell
/// two access keys apart in logs.
#[derive(Clone)]
pub struct KeyPrefixRedactor {}

impl RedactionFunction<String> for KeyPrefixRedactor {
    fn redact(s: &String) -> String {
        const VISIBLE_CHARS: usize = 4;

        if s.chars().count() <= VISIBLE_CHARS {
            return REDACTED_VALUE.to_string();
        }

        let prefix: String = s.chars().take(VISIBLE_CHARS).collect();
        format!("{prefix}{REDACTED_VALUE}")
    }
}

#[derive(Clone)]
pub struct CliSecret<T, R>
where
    R: RedactionFunction<T>,
{
    value: T,
    redaction_function: PhantomData<R>,
}

impl<T, R> CliSecret<T, R>
where
    R: RedactionFunction<T>,
{
    pub fn new(value: T) -> Self {
        Self {
            value,
            redaction_function: PhantomData,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, R> Deref for CliSecret<T, R>
where
    R: RedactionFunction<T>,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T, R> fmt::Debug for CliSecret<T, R>
where
    T: Display,
    R: RedactionFunction<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = R::redact(&self.value);
        f.write_str(&text)
    }
}

impl<T, R> FromStr for CliSecret<T, R>
where
    T: FromStr,
    R: RedactionFunction<T>,
{
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = T::from_str(s)?;
        Ok(CliSecret {
            value: t,
            redaction_function: PhantomData,
        })
    }
}
