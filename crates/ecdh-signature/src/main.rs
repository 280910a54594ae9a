use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ecdh_signature::{Cipher, Curve, SignatureContext, verify_with_public_key};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, ValueEnum)]
enum PrivateKeyCipher {
    #[value(name = "aes-128-cbc")]
    Aes128Cbc,
    #[value(name = "aes-256-cbc")]
    Aes256Cbc,
}

impl From<PrivateKeyCipher> for Cipher {
    fn from(cipher: PrivateKeyCipher) -> Self {
        match cipher {
            PrivateKeyCipher::Aes128Cbc => Cipher::Aes128Cbc,
            PrivateKeyCipher::Aes256Cbc => Cipher::Aes256Cbc,
        }
    }
}

#[derive(Parser)]
#[clap(name = "ecsig", version, about = "Sign and verify strings with elliptic-curve keys")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ContextArgs {
    #[clap(long, env = "ECSIG_SCHEME", default_value = "secp256k1")]
    scheme: String,
    #[clap(long, env = "ECSIG_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,
    #[clap(long, env = "ECSIG_CIPHER", default_value = "aes-256-cbc")]
    cipher: PrivateKeyCipher,
}

impl ContextArgs {
    fn build(self) -> Result<SignatureContext> {
        let mut builder = SignatureContext::builder(self.scheme).cipher(self.cipher.into());
        if let Some(passphrase) = self.passphrase {
            builder = builder.passphrase(passphrase);
        }
        builder.build().context("creating signature context")
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the supported curve names.
    Curves,
    /// Generate a fresh key pair and sign DATA with it.
    Sign {
        #[clap(flatten)]
        context: ContextArgs,
        data: String,
    },
    /// Verify a signature against a PEM public key.
    Verify {
        #[clap(long, env = "ECSIG_SCHEME", default_value = "secp256k1")]
        scheme: Curve,
        #[clap(long)]
        public_key: PathBuf,
        #[clap(long)]
        signature: String,
        data: String,
    },
    /// Sign DATA and verify the result with the same context.
    Demo {
        #[clap(flatten)]
        context: ContextArgs,
        #[clap(default_value = "hello-world")]
        data: String,
    },
}

#[derive(Serialize)]
struct SignOutput<'a> {
    scheme: &'a str,
    public_key: &'a str,
    signature: String,
}

#[derive(Serialize)]
struct VerifyOutput {
    valid: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Curves => {
            for curve in Curve::ALL {
                println!("{curve}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Sign { context, data } => {
            let ctx = context.build()?;
            let signature = ctx.sign(&data).context("signing data")?;
            print_json(&SignOutput {
                scheme: ctx.scheme(),
                public_key: ctx.public_key_pem(),
                signature,
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            scheme,
            public_key,
            signature,
            data,
        } => {
            let public_key_pem = std::fs::read_to_string(&public_key)
                .with_context(|| format!("reading public key from {}", public_key.display()))?;
            let valid = verify_with_public_key(scheme, &public_key_pem, &data, &signature)
                .context("verifying signature")?;
            print_json(&VerifyOutput { valid })?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Demo { context, data } => {
            let ctx = context.build()?;
            let signature = ctx.sign(&data).context("signing data")?;
            let valid = ctx.verify(&data, &signature).context("verifying signature")?;
            let tampered = ctx
                .verify(&format!("{data}!"), &signature)
                .context("verifying tampered data")?;
            println!("scheme:    {}", ctx.scheme());
            println!("signature: {signature}");
            println!("verified:  {valid}");
            println!("tampered:  {tampered}");
            Ok(if valid && !tampered { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}
