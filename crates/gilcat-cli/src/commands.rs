//! Subcommand definitions and execution.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use gilcat_client::{
  ApiClient,
  auth::{Credentials, Registration},
};
use gilcat_core::{
  cat::{Gender, NewCat},
  community::{NewComment, NewPost},
  geo::GeoPoint,
  model::CatModel,
  query::{
    DateRange, SearchFilters, SortContext, SortKey, SortOrder, filter_cats,
    sort_cats,
  },
};

use crate::state;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Browse and manage cats.
  #[command(subcommand)]
  Cats(CatsCommand),
  /// Sign in and out of the service.
  #[command(subcommand)]
  Auth(AuthCommand),
  /// Community feed.
  #[command(subcommand)]
  Community(CommunityCommand),
}

#[derive(Subcommand, Debug)]
pub enum CatsCommand {
  /// List registered cats.
  List {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 20)]
    size: u32,
    /// Filter: location substring.
    #[arg(long)]
    location: Option<String>,
    /// Filter: male | female | unknown.
    #[arg(long)]
    gender: Option<Gender>,
    /// Filter: neutered status (true | false).
    #[arg(long)]
    neutered: Option<bool>,
    /// Filter: characteristic tag (repeatable; any may match).
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Filter: only cats seen on or after this instant (RFC 3339).
    #[arg(long)]
    since: Option<DateTime<Utc>>,
    /// Filter: only cats seen on or before this instant (RFC 3339).
    #[arg(long)]
    until: Option<DateTime<Utc>>,
    /// Sort key: name | last_seen | likes | activity | distance.
    #[arg(long)]
    sort: Option<SortKey>,
    /// Sort descending instead of ascending.
    #[arg(long)]
    desc: bool,
    /// Reference latitude for the distance sort and distance display.
    #[arg(long)]
    lat: Option<f64>,
    /// Reference longitude for the distance sort and distance display.
    #[arg(long)]
    lng: Option<f64>,
  },
  /// Show one cat in detail.
  Show { id: String },
  /// Register a new cat.
  Report {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    location: String,
    /// Characteristic tag (repeatable, at least one).
    #[arg(long = "tag", required = true)]
    tags: Vec<String>,
    /// Free-text age label.
    #[arg(long, default_value = "unknown")]
    age: String,
    #[arg(long, default_value = "unknown")]
    gender: Gender,
    #[arg(long)]
    neutered: bool,
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lng: f64,
  },
  /// Toggle your like on a cat.
  Like { id: String },
  /// Cats near a point, closest first.
  Nearby {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lng: f64,
    /// Radius in metres.
    #[arg(long, default_value_t = 1000.0)]
    radius: f64,
    #[arg(long, default_value_t = 20)]
    limit: u32,
  },
  /// Free-text search over names, descriptions, and locations.
  Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
  /// Sign in and store the token locally.
  Login {
    #[arg(long)]
    email: String,
    /// Read from the terminal when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Create an account and store the token locally.
  Register {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Read from the terminal when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Drop the server session and the local token.
  Logout,
  /// Show the signed-in user.
  Whoami,
}

#[derive(Subcommand, Debug)]
pub enum CommunityCommand {
  /// List community posts.
  Posts {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 20)]
    size: u32,
  },
  /// Publish a post.
  Post { content: String },
  /// List the comments on a post.
  Comments { post_id: String },
  /// Comment on a post.
  Comment { post_id: String, content: String },
  /// Toggle your like on a post.
  Like { post_id: String },
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Cats(cmd) => run_cats(client, cmd).await,
    Command::Auth(cmd) => run_auth(client, cmd).await,
    Command::Community(cmd) => run_community(client, cmd).await,
  }
}

async fn run_cats(client: &ApiClient, command: CatsCommand) -> Result<()> {
  match command {
    CatsCommand::List {
      page,
      size,
      location,
      gender,
      neutered,
      tags,
      since,
      until,
      sort,
      desc,
      lat,
      lng,
    } => {
      let date_range = match (since, until) {
        (None, None) => None,
        (from, to) => Some(DateRange {
          from: from.unwrap_or(DateTime::<Utc>::MIN_UTC),
          to:   to.unwrap_or_else(Utc::now),
        }),
      };
      let filters = SearchFilters {
        location,
        gender,
        is_neutered: neutered,
        characteristics: tags,
        date_range,
      };
      let result = client.list_cats(page, size, &filters).await?;

      // The date range is a client-side filter; everything else was
      // already applied by the server.
      let models: Vec<CatModel> =
        result.items.iter().cloned().map(CatModel::new).collect();
      let mut models = filter_cats(&models, &filters);

      let reference = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        _ => None,
      };
      if let Some(key) = sort {
        let mut ctx = SortContext::now();
        ctx.reference = reference;
        let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
        sort_cats(&mut models, key, order, &ctx);
      }

      for cat in &models {
        print_cat_line(cat, reference);
      }
      println!(
        "page {} · {} of {} cats",
        result.page,
        models.len(),
        result.total
      );
      Ok(())
    }
    CatsCommand::Show { id } => {
      let cat = client.get_cat(&id).await?;
      print_cat_detail(&CatModel::new(cat));
      Ok(())
    }
    CatsCommand::Report {
      name,
      description,
      location,
      tags,
      age,
      gender,
      neutered,
      lat,
      lng,
    } => {
      let draft = NewCat {
        name,
        description,
        location,
        characteristics: tags,
        estimated_age: age,
        gender,
        image: None,
        coordinates: GeoPoint::new(lat, lng),
        is_neutered: neutered,
      };
      let cat = client.create_cat(&draft).await?;
      println!("registered {} ({})", cat.name, cat.id);
      Ok(())
    }
    CatsCommand::Like { id } => {
      let outcome = client.toggle_like(&id).await?;
      let verb = if outcome.is_liked { "liked" } else { "unliked" };
      println!("{verb} ({} total)", outcome.like_count);
      Ok(())
    }
    CatsCommand::Nearby { lat, lng, radius, limit } => {
      let reference = GeoPoint::new(lat, lng);
      let cats = client.nearby_cats(reference, radius, limit).await?;
      if cats.is_empty() {
        println!("no cats within {radius} m");
      }
      for cat in cats {
        print_cat_line(&CatModel::new(cat), Some(reference));
      }
      Ok(())
    }
    CatsCommand::Search { query } => {
      // Search history is explicit CLI-owned state, persisted per user.
      let mut recent = state::load_recent();
      recent.push(&query);
      state::save_recent(&recent)?;

      let cats = client.search_cats(&query).await?;
      for cat in &cats {
        print_cat_line(&CatModel::new(cat.clone()), None);
      }
      println!("{} match(es)", cats.len());
      if recent.len() > 1 {
        println!("recent: {}", recent.iter().collect::<Vec<_>>().join(", "));
      }
      Ok(())
    }
  }
}

async fn run_auth(client: &ApiClient, command: AuthCommand) -> Result<()> {
  match command {
    AuthCommand::Login { email, password } => {
      let password = match password {
        Some(p) => p,
        None => prompt_password()?,
      };
      let session = client.login(&Credentials { email, password }).await?;
      state::save_token(&session.token)?;
      println!("signed in as {}", session.user.name);
      Ok(())
    }
    AuthCommand::Register { name, email, password } => {
      let password = match password {
        Some(p) => p,
        None => prompt_password()?,
      };
      let session = client
        .register(&Registration { name, email, password })
        .await?;
      state::save_token(&session.token)?;
      println!("account created; signed in as {}", session.user.name);
      Ok(())
    }
    AuthCommand::Logout => {
      // Drop the server session first; clear the local token either way.
      if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "server-side logout failed");
      }
      state::clear_token()?;
      println!("signed out");
      Ok(())
    }
    AuthCommand::Whoami => {
      let user = client.check_auth().await?;
      println!("{} <{}>", user.name, user.email);
      Ok(())
    }
  }
}

async fn run_community(client: &ApiClient, command: CommunityCommand) -> Result<()> {
  match command {
    CommunityCommand::Posts { page, size } => {
      let now = Utc::now();
      let result = client.list_posts(page, size).await?;
      for post in &result.items {
        println!(
          "{}  {} · {} — likes {}, comments {}",
          post.id,
          post.author.name,
          post.age_label(now),
          post.likes,
          post.comments
        );
        println!("    {}", post.content);
      }
      println!("page {} of {} posts", result.page, result.total);
      Ok(())
    }
    CommunityCommand::Post { content } => {
      let post = client.create_post(&NewPost { content }).await?;
      println!("posted {}", post.id);
      Ok(())
    }
    CommunityCommand::Comments { post_id } => {
      let now = Utc::now();
      let comments = client.list_comments(&post_id).await?;
      for comment in &comments {
        println!(
          "{} · {}: {}",
          comment.age_label(now),
          comment.author.name,
          comment.content
        );
        for reply in &comment.replies {
          println!("    > {}: {}", reply.author.name, reply.content);
        }
      }
      println!("{} comment(s)", comments.len());
      Ok(())
    }
    CommunityCommand::Comment { post_id, content } => {
      client.add_comment(&post_id, &NewComment { content }).await?;
      println!("comment added");
      Ok(())
    }
    CommunityCommand::Like { post_id } => {
      let outcome = client.toggle_post_like(&post_id).await?;
      let verb = if outcome.is_liked { "liked" } else { "unliked" };
      println!("{verb} ({} total)", outcome.like_count);
      Ok(())
    }
  }
}

// ─── Output helpers ───────────────────────────────────────────────────────────

fn print_cat_line(cat: &CatModel, reference: Option<GeoPoint>) {
  let record = cat.record();
  let mut line = format!(
    "{}  {} [{}, {}] {} — likes {}, comments {}, reports {}",
    record.id,
    record.name,
    cat.gender_label(),
    cat.neutered_label(),
    record.location,
    record.likes,
    record.comments,
    record.report_count
  );
  if let Some(point) = reference {
    line.push_str(&format!(" — {}", format_distance(cat.distance_from(point))));
  }
  println!("{line}");
}

fn print_cat_detail(cat: &CatModel) {
  let record = cat.record();
  println!("{} ({})", record.name, record.id);
  println!("  gender:          {}", cat.gender_label());
  println!("  neutered:        {}", cat.neutered_label());
  println!("  age:             {}", record.estimated_age);
  println!(
    "  location:        {} ({:.4}, {:.4})",
    record.location, record.lat, record.lng
  );
  println!(
    "  characteristics: {}",
    record.characteristics.join(", ")
  );
  println!("  last seen:       {}", record.last_seen);
  println!("  activity:        {}", cat.activity_score(Utc::now()));
  println!(
    "  likes {} · comments {} · reports {}",
    record.likes, record.comments, record.report_count
  );
  if !record.description.is_empty() {
    println!("  {}", record.description);
  }
  println!("  reported by {}", record.reported_by.name);
}

fn format_distance(metres: f64) -> String {
  if metres < 1_000.0 {
    format!("{metres:.0} m")
  } else {
    format!("{:.1} km", metres / 1_000.0)
  }
}

/// Read a password from stdin. Plain echo; fine for a dev tool.
fn prompt_password() -> Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin()
    .lock()
    .read_line(&mut line)
    .context("reading password")?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
