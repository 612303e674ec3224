//! Terminal front end for listings.
//!
//! Renders the same view-models a web storefront would: "my listings", the
//! listing detail page, and the delete confirmation dialog.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use listings_core::common::{ListingId, UserId, ViewState};
use listings_core::domains::contacts::PgContactRepository;
use listings_core::domains::listings::{
    ContactsState, ListingDetailController, ListingListSession, PgListingRepository,
    NO_CONTACT_INFO_MESSAGE,
};
use listings_core::kernel::{BaseListingRepository, LocalIdentityProvider};
use listings_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "listings_cli")]
#[command(about = "Browse and manage listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's own listings, newest first
    List {
        #[arg(long)]
        user: UserId,
    },

    /// Show one listing as a given viewer sees it
    Show {
        listing: ListingId,
        #[arg(long)]
        viewer: Option<UserId>,
        /// Open the owner's contact options
        #[arg(long)]
        reveal: bool,
    },

    /// Delete one of your listings
    Delete {
        listing: ListingId,
        #[arg(long)]
        user: UserId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listings_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let listings: Arc<dyn BaseListingRepository> =
        Arc::new(PgListingRepository::new(pool.clone()));
    let contacts = PgContactRepository::new(pool);

    match cli.command {
        Commands::List { user } => {
            let identity = LocalIdentityProvider::signed_in(user);
            let session = ListingListSession::start(&identity, listings, config.controller);
            session.settle().await;
            print_list(&session)?;
            session.teardown();
        }

        Commands::Show {
            listing,
            viewer,
            reveal,
        } => {
            let mut controller = ListingDetailController::new(listing, viewer, config.controller);
            controller.load_with(listings.as_ref(), &contacts).await;
            print_detail(&mut controller, reveal)?;
        }

        Commands::Delete { listing, user, yes } => {
            let identity = LocalIdentityProvider::signed_in(user);
            let session = ListingListSession::start(&identity, listings, config.controller);
            session.settle().await;

            if let ViewState::Error(message) = session.state() {
                bail!(message);
            }
            if !session.request_delete(listing) {
                bail!("Listing {} is not one of your listings", listing);
            }

            let prompt = session
                .confirmation_prompt()
                .unwrap_or_else(|| "Delete this listing?".to_string());
            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(prompt)
                    .default(false)
                    .interact()?;

            if confirmed {
                session.confirm_delete().await;
            } else {
                session.cancel_delete();
                println!("Cancelled");
            }
            print_list(&session)?;
            session.teardown();
        }
    }

    Ok(())
}

fn print_list(session: &ListingListSession) -> Result<()> {
    if let Some(notice) = session.notice() {
        println!("{}", notice.message);
    }
    match session.state() {
        ViewState::Loading => println!("Loading..."),
        ViewState::Error(message) => bail!(message),
        ViewState::Ready(listings) => {
            println!("Your Listings");
            if let Some(message) = session.empty_message() {
                println!("{}", message);
            }
            for listing in listings {
                let view = listing.view(true);
                println!("  {}  {}  {}", listing.id, view.name, view.price_label);
            }
        }
    }
    Ok(())
}

fn print_detail(controller: &mut ListingDetailController, reveal: bool) -> Result<()> {
    if let Some(message) = controller.state().error() {
        bail!(message.to_string());
    }
    let Some(view) = controller.view() else {
        println!("Loading...");
        return Ok(());
    };

    if view.own_listing {
        println!("Note: You are viewing your own listing.");
    }
    println!("{}", view.name);
    println!("  Price:       {}", view.price_label);
    println!("  Location:    {}", view.location);
    println!("  Category:    {}", view.category);
    println!("  Condition:   {}", view.condition);
    println!("  Description: {}", view.description);
    for url in view.image_urls.unwrap_or_default() {
        println!("  Image:       {}", url);
    }

    if controller.is_owner() {
        if let Some(intent) = controller.edit() {
            println!("Edit at {}", intent.path());
        }
        return Ok(());
    }

    if reveal && controller.reveal_contacts() {
        println!("Contact Options");
        match controller.contact_options() {
            Some(options) if options.is_empty() => println!("  {}", NO_CONTACT_INFO_MESSAGE),
            Some(options) => {
                for option in options {
                    let link = option.link.as_deref().unwrap_or("#");
                    println!("  {}: {} ({})", option.label, option.value, link);
                }
            }
            None => {
                if let ContactsState::Failed(message) = controller.contacts() {
                    println!("  {}", message);
                }
            }
        }
    }
    Ok(())
}
