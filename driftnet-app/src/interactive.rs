use crate::cli::HarvestRequest;
use anyhow::Result;
use dialoguer::{Confirm, Input};
use driftnet_common::ItemLimit;
use driftnet_social::timeline::account::normalize_handle;

/// Ask for account, limit, output name, and browser visibility.
pub fn prompt_request(default_headless: bool) -> Result<HarvestRequest> {
    let raw: String = Input::new()
        .with_prompt("Account to harvest (with or without @)")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            normalize_handle(input)
                .map(|_| ())
                .ok_or("Please enter a handle made of letters, digits, and underscores.")
        })
        .interact_text()?;
    // validated above
    let account = normalize_handle(&raw).unwrap_or(raw);

    let limit = if Confirm::new()
        .with_prompt("Limit the number of posts to harvest?")
        .default(false)
        .interact()?
    {
        let max: usize = Input::new()
            .with_prompt("Maximum number of posts")
            .validate_with(|n: &usize| -> Result<(), &'static str> {
                if *n > 0 {
                    Ok(())
                } else {
                    Err("Please enter a positive number.")
                }
            })
            .interact_text()?;
        ItemLimit::Bounded(max)
    } else {
        ItemLimit::Unbounded
    };

    let output_name = if Confirm::new()
        .with_prompt("Specify an output file name?")
        .default(false)
        .interact()?
    {
        let name: String = Input::new()
            .with_prompt("Output file name (saved as .txt)")
            .interact_text()?;
        Some(name)
    } else {
        None
    };

    let headless = Confirm::new()
        .with_prompt("Run in headless mode (no visible browser)?")
        .default(default_headless)
        .interact()?;

    Ok(HarvestRequest {
        account,
        limit,
        output_name,
        headless: Some(headless),
    })
}

/// True when a prompt failed because the user pressed Ctrl-C or closed it.
pub fn is_interrupted(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<dialoguer::Error>(),
        Some(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn interrupted_prompt_counts_as_cancel() {
        let err = anyhow::Error::from(dialoguer::Error::IO(io::Error::from(
            io::ErrorKind::Interrupted,
        )));
        assert!(is_interrupted(&err));
    }

    #[test]
    fn other_prompt_failures_are_real_errors() {
        let not_a_tty = anyhow::Error::from(dialoguer::Error::IO(io::Error::new(
            io::ErrorKind::NotConnected,
            "not a terminal",
        )));
        assert!(!is_interrupted(&not_a_tty));
        assert!(!is_interrupted(&anyhow::anyhow!("interrupted")));
    }
}
