//! Command-line schema and command execution for the `forum` binary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, Credentials, ForumClient, NewCategory, NewPost, Reaction};
use crate::config::{Config, ConfigError};
use crate::store::Scope;
use crate::transport::{Attachment, TransportError};

#[derive(Parser, Debug)]
#[command(name = "forum")]
#[command(about = "Command-line client for the forum API")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file and FORUM_API_URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Sign in as this user before running the command
    #[arg(long, requires = "password", global = true)]
    pub username: Option<String>,

    #[arg(long, requires = "username", global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List all categories
    Categories,
    /// Show one category
    Category { title: String },
    /// Create a category
    AddCategory {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Cover image file
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// List profiles, optionally by owner or category
    Profiles {
        #[arg(long, conflicts_with = "category")]
        user: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List posts, newest first
    Posts {
        #[arg(long, conflicts_with_all = ["profile", "author"])]
        category: Option<String>,
        #[arg(long, conflicts_with = "author")]
        profile: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Only posts created strictly before this RFC 3339 time
        #[arg(long, value_name = "TIME")]
        before: Option<DateTime<Utc>>,
    },
    /// Publish a post
    CreatePost {
        #[arg(long)]
        category: String,
        /// Id of the publishing profile
        #[arg(long)]
        profile: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Image file; repeat for several
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
    },
    /// Delete a post
    DeletePost { id: String },
    /// List comments of a post
    Comments {
        post: String,
        #[arg(long, value_name = "TIME")]
        before: Option<DateTime<Utc>>,
    },
    Like { target: Target, id: String },
    Dislike { target: Target, id: String },
    /// Block content (moderators only)
    Block { target: Target, id: String },
}

/// Entity kinds that take reactions.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Post,
    Comment,
    Subcomment,
}

impl Cli {
    /// Resolve configuration: file, then environment, then flags.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
            config.validate()?;
        }
        Ok(config)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}

/// Run one command against `client`, signing in first when credentials
/// are given. Returns the JSON to print.
pub async fn execute(
    client: &ForumClient,
    credentials: Option<&Credentials>,
    command: Command,
) -> Result<Value, ApiError> {
    if let Some(credentials) = credentials {
        client.auth().signin(credentials).await?;
    }

    match command {
        Command::Categories => to_json(client.categories().fetch(&Scope::All).await?),
        Command::Category { title } => to_json(client.categories().fetch_by_title(&title).await?),
        Command::AddCategory {
            title,
            description,
            image,
        } => {
            let image = match image {
                Some(path) => Some(Attachment::from_path(&path).await?),
                None => None,
            };
            let payload = NewCategory {
                description,
                image,
                ..NewCategory::new(title)
            };
            to_json(client.categories().create(payload).await?)
        }
        Command::Profiles { user, category } => {
            let scope = match (user, category) {
                (Some(user), _) => Scope::Author(user),
                (None, Some(category)) => Scope::Category(category),
                (None, None) => Scope::All,
            };
            to_json(client.profiles().fetch(&scope).await?)
        }
        Command::Posts {
            category,
            profile,
            author,
            before,
        } => {
            let scope = match (category, profile, author) {
                (Some(category), _, _) => Scope::Category(category),
                (None, Some(profile), _) => Scope::Profile(profile),
                (None, None, Some(author)) => Scope::Author(author),
                (None, None, None) => Scope::All,
            };
            match before {
                Some(before) => {
                    client.posts().fetch_more(&scope, before).await?;
                    to_json(client.posts().list(&scope))
                }
                None => to_json(client.posts().fetch(&scope).await?),
            }
        }
        Command::CreatePost {
            category,
            profile,
            title,
            content,
            images,
        } => {
            let mut attachments = Vec::with_capacity(images.len());
            for path in &images {
                attachments.push(Attachment::from_path(path).await?);
            }
            let payload = NewPost {
                category,
                profile,
                title,
                content,
                images: attachments,
            };
            to_json(client.posts().create(payload).await?)
        }
        Command::DeletePost { id } => {
            client.posts().delete(&id).await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
        Command::Comments { post, before } => {
            let scope = Scope::Post(post);
            match before {
                Some(before) => {
                    client.comments().fetch_more(&scope, before).await?;
                    to_json(client.comments().list(&scope))
                }
                None => to_json(client.comments().fetch(&scope).await?),
            }
        }
        Command::Like { target, id } => react(client, target, &id, Reaction::Like).await,
        Command::Dislike { target, id } => react(client, target, &id, Reaction::Dislike).await,
        Command::Block { target, id } => react(client, target, &id, Reaction::Block).await,
    }
}

async fn react(
    client: &ForumClient,
    target: Target,
    id: &str,
    reaction: Reaction,
) -> Result<Value, ApiError> {
    match target {
        Target::Post => to_json(client.posts().react(id, reaction).await?),
        Target::Comment => to_json(client.comments().react(id, reaction).await?),
        Target::Subcomment => to_json(client.subcomments().react(id, reaction).await?),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::from(TransportError::from(e)))
}
