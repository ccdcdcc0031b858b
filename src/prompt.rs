//! Answers the installer's questions on the terminal.

use mod_installer_lib::services::decisions::{
    DecisionProvider, OverwriteAction, OverwriteDecision, PromptReason,
};
use mod_installer_lib::services::tree::DirectoryNode;
use std::io::{self, Write};
use std::path::Path;

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn prompt_confirm(prompt: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        match prompt_line(&format!("{prompt} {hint}: "))?.to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => return Ok(default),
            _ => continue,
        }
    }
}

fn print_tree(node: &DirectoryNode, depth: usize) {
    let indent = "  ".repeat(depth);
    for child in &node.nodes {
        println!("{indent}{}/", child.name);
        print_tree(child, depth + 1);
    }
    for leaf in &node.leaves {
        println!("{indent}{}", leaf.name);
    }
}

#[derive(Debug, Default)]
pub struct TerminalDecisions;

impl DecisionProvider for TerminalDecisions {
    fn get_password(&mut self) -> Option<String> {
        match prompt_line("Archive password (empty to give up): ") {
            Ok(password) if !password.is_empty() => Some(password),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Could not read password: {e}");
                None
            }
        }
    }

    fn resolve_overwrite(&mut self, target: &Path) -> OverwriteDecision {
        println!("\"{}\" already exists.", target.display());
        loop {
            let answer =
                match prompt_line("[m]erge, [r]eplace, re[n]ame, [b]ackup first, [a]bort: ") {
                    Ok(answer) => answer.to_lowercase(),
                    Err(e) => {
                        log::warn!("Could not read answer: {e}");
                        return OverwriteDecision::new(OverwriteAction::Abort);
                    }
                };
            let action = match answer.as_str() {
                "m" | "merge" => OverwriteAction::Merge,
                "r" | "replace" => OverwriteAction::Replace,
                "n" | "rename" => OverwriteAction::Rename,
                "b" | "backup" => OverwriteAction::Backup,
                "a" | "abort" => OverwriteAction::Abort,
                _ => continue,
            };
            return OverwriteDecision::new(action);
        }
    }

    fn get_mod_name(&mut self, reason: PromptReason, current: &str) -> Option<String> {
        if reason == PromptReason::InvalidName {
            println!("The mod name is not usable as a directory name.");
        }
        let prompt = if current.is_empty() {
            "Mod name (empty to cancel): ".to_string()
        } else {
            format!("Mod name [{current}]: ")
        };
        match prompt_line(&prompt) {
            Ok(name) if !name.is_empty() => Some(name),
            Ok(_) if reason == PromptReason::Rename || current.is_empty() => None,
            Ok(_) => Some(current.to_string()),
            Err(e) => {
                log::warn!("Could not read mod name: {e}");
                None
            }
        }
    }

    fn confirm_manual_install(&mut self, tree: &DirectoryNode) -> bool {
        println!("No installer recognised this layout ({} files):", tree.file_count());
        print_tree(tree, 1);
        prompt_confirm("Install the archive exactly as shown?", false).unwrap_or_else(|e| {
            log::warn!("Could not read answer: {e}");
            false
        })
    }

    fn report_error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn progress_file(&mut self, name: &str) {
        log::debug!("extracting {name}");
    }

    fn extraction_error(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }
}
