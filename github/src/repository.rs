use crate::error::GithubError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9._-]+?)(?:\.git)?/?$")
        .expect("Failed to compile repository slug regex")
});

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?github\.com/([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9._-]+?)(?:\.git)?/?$",
    )
    .expect("Failed to compile repository URL regex")
});

/// A GitHub repository identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new<O: Into<String>, N: Into<String>>(owner: O, name: N) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/repo` or a `https://github.com/owner/repo` URL,
    /// with an optional `.git` suffix or trailing slash
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let captures = SLUG_PATTERN
            .captures(trimmed)
            .or_else(|| URL_PATTERN.captures(trimmed))?;

        let name = &captures[2];
        if name == "." || name == ".." {
            return None;
        }
        Some(Self::new(&captures[1], name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repository {
    type Err = GithubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| GithubError::InvalidRepository(s.to_string()))
    }
}
