//! Console adapter: renders the site in a terminal and drives it from typed
//! commands. Anything that is not a command goes to the assistant.

pub mod location;
pub mod pages;

use std::io::Write;

use crate::application::errors::SiteError;
use crate::application::messaging::{Input, InputParser};
use crate::application::services::{AdminDashboard, AdminTab, ChatRelay, ConsentOutcome, Conversation};
use crate::application::shell::AppShell;
use crate::domain::entities::{Icon, Software, View};

pub use location::{ConsoleDeviceLocator, ConsoleInput};

const HELP: &str = "\
Navigation
  /home · /downloads · /go <page> · /open <n|id> · /back
Pages: home downloads detail admin product-windows product-macos product-android
       product-ios support-help support-kb support-status contact legal-privacy
       legal-terms legal-cookies
Localisation
  /allow · /deny
Assistant
  <texte libre> · /chat · /reset
Administration
  /admin · /login <code> · /logout · /tab <overview|products|users|location>
  /visitors · /new <nom> · /set <id> <champ> <valeur> · /delete <id>
Champs: name tagline short full version size update icon url image features os ram storage
  /help · /quit";

/// Outcome of one console command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Terminal front-end for the site
pub struct ConsoleAdapter {
    shell: AppShell,
    relay: ChatRelay,
    conversation: Conversation,
    parser: InputParser,
    input: ConsoleInput,
}

impl ConsoleAdapter {
    pub fn new(shell: AppShell, relay: ChatRelay, parser: InputParser, input: ConsoleInput) -> Self {
        Self {
            shell,
            relay,
            conversation: Conversation::new(),
            parser,
            input,
        }
    }

    /// Load the catalog, start tracking and serve commands until end of input
    pub async fn run(mut self) {
        tracing::info!("Starting console site (dev mode)");
        println!("Chargement...");
        self.shell.load().await;
        let tracking = self.shell.start_tracking();

        self.show();
        println!("(/help pour la liste des commandes)");

        while let Some(line) = self.input.read_line("> ").await {
            self.shell.poll_events();
            let input = self.parser.parse(&line);
            if self.handle(input).await == Flow::Quit {
                break;
            }
            self.shell.poll_events();
            if let Some(notice) = self.shell.take_notice() {
                println!("✔ {}", notice);
            }
        }

        tracking.abort();
        tracing::info!("Console session closed");
    }

    fn show(&self) {
        println!("{}", pages::render(&self.shell));
    }

    async fn handle(&mut self, input: Input) -> Flow {
        match input {
            Input::Empty => {
                self.show();
            }
            Input::Text(text) => self.chat(&text).await,
            Input::Command { ref name, ref args } => {
                let rest = input.rest().unwrap_or_default();
                if let Err(e) = self.command(name, args, &rest).await {
                    println!("Erreur: {}", e);
                }
                if name == "quit" || name == "exit" {
                    return Flow::Quit;
                }
            }
        }
        Flow::Continue
    }

    /// `rest` is every argument joined back together, for free-form values
    async fn command(&mut self, name: &str, args: &[String], rest: &str) -> Result<(), SiteError> {
        match name {
            "help" => println!("{}", HELP),
            "quit" | "exit" => {}
            "home" => self.go(View::Home),
            "downloads" | "back" => self.go(View::Downloads),
            "go" => {
                let slug = args.first().map(String::as_str).unwrap_or("home");
                let view = slug
                    .parse::<View>()
                    .map_err(|e| SiteError::NotFound(e.to_string()))?;
                if view == View::Detail && self.shell.selected().is_none() {
                    return Err(SiteError::NotFound("aucun logiciel sélectionné".to_string()));
                }
                self.go(view);
            }
            "open" => {
                let key = args
                    .first()
                    .ok_or_else(|| SiteError::Validation("Usage: /open <n|id>".to_string()))?;
                let id = self.resolve_id(key)?;
                self.shell.select_software(&id)?;
                self.show();
            }
            "allow" => self.allow_location().await,
            "deny" => {
                self.shell.dismiss_location_prompt();
                println!("Localisation précise refusée.");
            }
            "chat" => println!("{}", pages::conversation(self.conversation.messages())),
            "reset" => {
                self.conversation.reset(&mut self.relay);
                println!("{}", pages::conversation(self.conversation.messages()));
            }
            "admin" => self.go(View::Admin),
            "login" => {
                self.shell.admin_login(rest).await?;
                self.go(View::Admin);
            }
            "logout" => {
                self.shell.admin_logout();
                self.show();
            }
            "tab" => {
                let tab = args
                    .first()
                    .and_then(|t| AdminTab::parse(t))
                    .ok_or_else(|| SiteError::Validation("Onglet inconnu".to_string()))?;
                self.shell.admin_tab(tab).await;
                self.show();
            }
            "visitors" => {
                self.shell.admin_refresh_visitors().await;
                self.show();
            }
            "new" => {
                if rest.is_empty() {
                    return Err(SiteError::Validation("Usage: /new <nom>".to_string()));
                }
                let mut draft = AdminDashboard::new_draft();
                draft.name = rest.to_string();
                let saved = self.shell.save_software(draft).await?;
                println!("Créé: {} ({})", saved.name, saved.id.as_deref().unwrap_or("-"));
            }
            "set" => {
                if args.len() < 3 {
                    return Err(SiteError::Validation("Usage: /set <id> <champ> <valeur>".to_string()));
                }
                let id = self.resolve_id(&args[0])?;
                let mut draft = self
                    .shell
                    .softwares()
                    .iter()
                    .find(|s| s.id.as_deref() == Some(id.as_str()))
                    .cloned()
                    .ok_or_else(|| SiteError::NotFound(format!("software {}", id)))?;
                set_field(&mut draft, &args[1], &args[2..].join(" "))?;
                let saved = self.shell.save_software(draft).await?;
                println!("Mis à jour: {}", saved.name);
            }
            "delete" => {
                let key = args
                    .first()
                    .ok_or_else(|| SiteError::Validation("Usage: /delete <id>".to_string()))?;
                let id = self.resolve_id(key)?;
                self.shell.delete_software(&id).await?;
                println!("Supprimé: {}", id);
            }
            other => {
                return Err(SiteError::NotFound(format!("commande /{} (voir /help)", other)));
            }
        }
        Ok(())
    }

    fn go(&mut self, view: View) {
        self.shell.navigate(view);
        self.show();
    }

    /// Accept a 1-based list position or a record id
    fn resolve_id(&self, key: &str) -> Result<String, SiteError> {
        let softwares = self.shell.softwares();
        if let Ok(n) = key.parse::<usize>() {
            if let Some(software) = n.checked_sub(1).and_then(|i| softwares.get(i)) {
                if let Some(id) = &software.id {
                    return Ok(id.clone());
                }
            }
        }
        if softwares.iter().any(|s| s.id.as_deref() == Some(key)) {
            return Ok(key.to_string());
        }
        Err(SiteError::NotFound(format!("software {}", key)))
    }

    async fn allow_location(&mut self) {
        if !self.shell.location_prompt_visible() {
            println!("Aucune demande de localisation en cours.");
            return;
        }
        match self.shell.accept_location().await {
            ConsentOutcome::Enriched(pos) => {
                println!("Position enregistrée: {:.5}, {:.5} (±{:.0} m)", pos.latitude, pos.longitude, pos.accuracy);
            }
            ConsentOutcome::Failed(e) => println!("Localisation impossible: {}", e),
            ConsentOutcome::NotLogged => println!("Aucune visite enregistrée pour cette session."),
            ConsentOutcome::AlreadyEnriched => println!("Localisation déjà activée."),
        }
    }

    async fn chat(&mut self, text: &str) {
        print!("[zetsu] ");
        let _ = std::io::stdout().flush();
        let reply = self
            .conversation
            .submit(&mut self.relay, text, |fragment| {
                print!("{}", fragment);
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();

        let failed = reply
            .and_then(|id| self.conversation.messages().iter().find(|m| m.id == id))
            .filter(|m| m.is_error);
        if let Some(error) = failed {
            println!("⚠ {}", error.text);
        }
    }
}

/// Apply one admin form field to `software`
pub fn set_field(software: &mut Software, field: &str, value: &str) -> Result<(), SiteError> {
    let value = value.trim().to_string();
    match field.to_lowercase().as_str() {
        "name" => software.name = value,
        "tagline" => software.tagline = value,
        "short" | "shortdescription" => software.short_description = value,
        "full" | "fulldescription" => software.full_description = value,
        "version" => software.version = value,
        "size" => software.size = value,
        "update" | "lastupdate" => software.last_update = value,
        "icon" | "iconname" => {
            software.icon_name = value
                .parse::<Icon>()
                .map_err(|e| SiteError::Validation(e.to_string()))?;
        }
        "url" | "downloadurl" => software.download_url = value,
        "image" | "imageurl" => software.image_url = Some(value),
        "features" => {
            software.features = value
                .split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect();
        }
        "os" => software.requirements.os = value,
        "ram" => software.requirements.ram = value,
        "storage" => software.requirements.storage = value,
        other => return Err(SiteError::Validation(format!("Champ inconnu: {}", other))),
    }
    Ok(())
}
