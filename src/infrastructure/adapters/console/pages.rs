//! Text rendering of every site view

use std::fmt::Write;

use crate::application::services::{AdminDashboard, AdminTab};
use crate::application::shell::AppShell;
use crate::domain::entities::{ChatMessage, ChatRole, NavTab, Platform, Software, View};

const RULE: &str = "────────────────────────────────────────────────────────";

/// Render the whole screen for the shell's current view
pub fn render(shell: &AppShell) -> String {
    let mut out = String::new();
    let view = shell.view();

    if view.shows_site_chrome() {
        out.push_str(&navbar(view.nav_tab()));
    }

    let body = match view {
        View::Home => home(),
        View::Downloads => downloads(shell.softwares()),
        View::Detail => match shell.selected() {
            Some(software) => detail(software),
            None => String::new(),
        },
        View::Admin => admin(shell.admin(), shell.softwares()),
        View::Product(platform) => product(platform),
        View::SupportHelp => support_help(),
        View::SupportKb => support_kb(),
        View::SupportStatus => support_status(),
        View::Contact => contact(),
        View::LegalPrivacy => legal(
            "Politique de Confidentialité",
            "Zetsu collecte le minimum de données nécessaires au fonctionnement du service. \
Les journaux de visite (adresse IP, ville, pays, fournisseur) servent uniquement à optimiser nos serveurs. \
La localisation précise n'est enregistrée qu'avec votre accord explicite.",
        ),
        View::LegalTerms => legal(
            "Conditions d'Utilisation",
            "L'utilisation des logiciels Zetsu implique l'acceptation des présentes conditions. \
Les licences sont personnelles et non transférables.",
        ),
        View::LegalCookies => legal(
            "Politique des Cookies",
            "Ce site n'utilise qu'un marqueur de session pour éviter d'enregistrer deux fois la même visite. \
Il disparaît à la fermeture de votre navigateur.",
        ),
    };
    out.push_str(&body);

    if view.shows_site_chrome() {
        out.push_str(&footer());
    }

    if shell.location_prompt_visible() {
        out.push_str(&location_prompt());
    }

    out
}

fn navbar(active: NavTab) -> String {
    let mark = |tab: NavTab, label: &str| {
        if tab == active {
            format!("[{}]", label)
        } else {
            label.to_string()
        }
    };
    format!(
        "ZETSU  {}  {}  Fonctionnalités  Assistant\n{}\n",
        mark(NavTab::Home, "Accueil"),
        mark(NavTab::Downloads, "Téléchargements"),
        RULE
    )
}

fn footer() -> String {
    format!(
        "{}\nSupport: Centre d'aide (/go support-help) · Base de connaissances (/go support-kb) · État du service (/go support-status) · Contact (/go contact)\n\
Légal: Confidentialité (/go legal-privacy) · Conditions d'utilisation (/go legal-terms) · Cookies (/go legal-cookies)\n\
Produits: /go product-windows · product-macos · product-android · product-ios\n",
        RULE
    )
}

fn location_prompt() -> String {
    "\n📍 Optimisation Serveur\n\
Autorisez la géolocalisation pour trouver le serveur Zetsu le plus proche et améliorer votre vitesse de téléchargement.\n\
  /allow  Autoriser     /deny  Refuser\n"
        .to_string()
}

fn home() -> String {
    let mut out = String::new();
    out.push_str("\nVersion 4.0 avec Moteur IA Gemini\n");
    out.push_str("La cybersécurité de nouvelle génération. (/downloads pour télécharger)\n\n");
    out.push_str("  10M+ Menaces Bloquées/Jour · 99.9% Taux de Détection · 0% Impact Performance\n\n");

    let features = [
        ("Bouclier Temps Réel", "Surveillance active des fichiers et processus. Bloque les ransomwares avant le chiffrement."),
        ("Performance Maximale", "Conçu pour les gamers et les pros. Mode silencieux intelligent qui libère vos ressources CPU."),
        ("VPN Haut débit", "Naviguez anonymement avec notre réseau mondial de serveurs chiffrés AES-256."),
        ("Coffre-fort Numérique", "Stockez vos mots de passe et documents sensibles dans un espace ultra-sécurisé."),
        ("Anti-Tracking", "Empêche les annonceurs et les sites web de collecter vos données personnelles."),
        ("Pare-feu Intelligent", "Filtre le trafic entrant et sortant pour stopper les intrusions réseau."),
    ];
    out.push_str("Fonctionnalités\n");
    for (title, description) in features {
        let _ = writeln!(out, "  • {} - {}", title, description);
    }

    out.push_str("\nTarifs\n");
    for (name, price) in [("Zetsu Core", "0€"), ("Zetsu Prime", "29.99€"), ("Zetsu Omni", "49.99€")] {
        let _ = writeln!(out, "  {:<12} {}", name, price);
    }
    out
}

fn downloads(softwares: &[Software]) -> String {
    let mut out = String::from("\nTéléchargement\n\n");
    if softwares.is_empty() {
        out.push_str("Aucun logiciel disponible pour le moment.\n");
        return out;
    }
    for (i, software) in softwares.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} {}  v{} · {}\n    {}\n    {}",
            i + 1,
            software.icon_name.glyph(),
            software.name,
            software.version,
            software.size,
            software.tagline,
            software.short_description
        );
    }
    out.push_str("\n/open <n> pour voir le détail\n");
    out
}

pub fn detail(software: &Software) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{} {}", software.icon_name.glyph(), software.name);
    let _ = writeln!(out, "{}\n", software.tagline);
    let _ = writeln!(out, "{}\n", software.full_description);

    out.push_str("Fonctionnalités Clés\n");
    for feature in &software.features {
        let _ = writeln!(out, "  ✓ {}", feature);
    }

    let _ = writeln!(
        out,
        "\nVersion {} · {} · Mise à jour {}",
        software.version, software.size, software.last_update
    );
    out.push_str("\nConfiguration Requise\n");
    let _ = writeln!(out, "  Système d'exploitation: {}", software.requirements.os);
    let _ = writeln!(out, "  Processeur / RAM: {}", software.requirements.ram);
    let _ = writeln!(out, "  Espace disque: {}", software.requirements.storage);
    let _ = writeln!(out, "\nTélécharger: {}", software.download_url);
    out
}

fn product(platform: Platform) -> String {
    let (title, subtitle, description) = match platform {
        Platform::Windows => (
            "Zetsu pour Windows",
            "Protection ultime pour PC & Gaming",
            "Léger, rapide et impitoyable contre les menaces. Optimisé pour Windows 10 et 11 avec un mode jeu dédié.",
        ),
        Platform::MacOs => (
            "Zetsu pour macOS",
            "Design élégant, Sécurité robuste",
            "Conçu nativement pour les puces Apple Silicon. Une protection invisible qui respecte l'autonomie de votre Mac.",
        ),
        Platform::Android => (
            "Zetsu Mobile pour Android",
            "Sécurisez votre vie mobile",
            "Protection contre les applications malveillantes, le vol de données et les réseaux Wi-Fi dangereux.",
        ),
        Platform::Ios => (
            "Zetsu Mobile pour iOS",
            "Confidentialité renforcée pour iPhone",
            "Protégez votre identité numérique et naviguez en toute sécurité sur votre iPhone et iPad.",
        ),
    };
    format!("\n{}\n{}\n\n{}\n\n/downloads pour télécharger\n", title, subtitle, description)
}

fn support_help() -> String {
    "\nComment pouvons-nous vous aider ?\n\
Notre équipe d'experts est disponible 24/7 pour vous assister.\n\n\
  Documentation - Consultez nos guides détaillés pour installer et configurer Zetsu.\n\
  Forum Communautaire - Rejoignez la discussion avec d'autres utilisateurs et experts.\n\
  Support Premium - Pour les abonnés Pro et Omni, obtenez une assistance prioritaire.\n"
        .to_string()
}

fn support_kb() -> String {
    let mut out = String::from("\nBase de Connaissances\n");
    for topic in [
        "Installation & Démarrage",
        "Configuration du VPN",
        "Gestion du compte",
        "Résolution des problèmes",
        "Facturation & Abonnements",
        "Sécurité Mobile",
    ] {
        let _ = writeln!(out, "  • {}", topic);
    }
    out
}

fn support_status() -> String {
    let mut out = String::from("\nÉtat des Services Zetsu\nSuivi en temps réel de nos infrastructures mondiales.\n\n");
    for (name, status) in [
        ("API Principale", "Opérationnel"),
        ("Serveurs VPN (Europe)", "Opérationnel"),
        ("Serveurs VPN (Asie)", "Performance dégradée"),
        ("Serveurs VPN (Amériques)", "Opérationnel"),
        ("Base de données des menaces", "Opérationnel"),
        ("Portail Client", "Opérationnel"),
    ] {
        let _ = writeln!(out, "  {:<30} {}", name, status);
    }
    out
}

fn contact() -> String {
    "\nContactez-nous\n\
Une question ? Un partenariat ? Nous sommes à votre écoute.\n\n\
  Email: contact@zetsu-security.com\n\
  Téléphone: +33 1 23 45 67 89 (Lundi - Vendredi, 9h - 18h CET)\n"
        .to_string()
}

fn legal(title: &str, body: &str) -> String {
    format!("\n{}\n\n{}\n", title, body)
}

fn admin(dashboard: &AdminDashboard, softwares: &[Software]) -> String {
    let mut out = String::new();
    if !dashboard.is_authenticated() {
        out.push_str("Administration Zetsu\nAccès sécurisé réservé au personnel autorisé\n\n/login <code d'accès>\n");
        return out;
    }

    let _ = writeln!(out, "ZETSU ADMIN · {}  (Système Opérationnel)\n{}", dashboard.tab().title(), RULE);
    out.push_str("Onglets: /tab overview · products · users · location   /logout\n\n");

    match dashboard.tab() {
        AdminTab::Overview => {
            let stats = dashboard.stats(softwares);
            let _ = writeln!(out, "  Logiciels Actifs    {}", stats.software_count);
            let _ = writeln!(out, "  Visiteurs           {}", stats.visitor_count);
            let _ = writeln!(out, "  Pays uniques        {}", stats.unique_countries);
            let _ = writeln!(out, "  Localisations GPS   {}", stats.gps_visitors);
        }
        AdminTab::Products => {
            for software in softwares {
                let _ = writeln!(
                    out,
                    "  {} {:<24} v{:<8} {}",
                    software.icon_name.glyph(),
                    software.name,
                    software.version,
                    software.id.as_deref().unwrap_or("-")
                );
            }
            out.push_str("\n/new <nom> · /set <id> <champ> <valeur> · /delete <id>\n");
        }
        AdminTab::Users => {
            if dashboard.visitors().is_empty() {
                out.push_str("  Aucun visiteur enregistré.\n");
            }
            for visitor in dashboard.visitors() {
                let _ = writeln!(
                    out,
                    "  {}  {:<15} {} {} ({}) · {} · {}",
                    visitor.timestamp.format("%Y-%m-%d %H:%M"),
                    visitor.ip,
                    visitor.country_code,
                    visitor.country,
                    visitor.city,
                    visitor.isp,
                    visitor.location_method.map(|m| m.as_str()).unwrap_or("IP")
                );
            }
        }
        AdminTab::Location => {
            let gps = dashboard.gps_visitors();
            if gps.is_empty() {
                out.push_str("  Aucune localisation GPS.\n");
            }
            for visitor in gps {
                if let Some((lat, lon)) = visitor.coordinates() {
                    let _ = writeln!(
                        out,
                        "  {:<15} {:.5}, {:.5} (±{:.0} m) · {}",
                        visitor.ip,
                        lat,
                        lon,
                        visitor.accuracy.unwrap_or_default(),
                        visitor.city
                    );
                }
            }
        }
    }
    out
}

/// Chat transcript, newest last
pub fn conversation(messages: &[ChatMessage]) -> String {
    let mut out = String::from("Zetsu Cyber-Assistant\n");
    for msg in messages {
        let who = match msg.role {
            ChatRole::User => "vous",
            ChatRole::Model => "zetsu",
        };
        let marker = if msg.is_error { " ⚠" } else { "" };
        let _ = writeln!(out, "  [{}{}] {}", who, marker, msg.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::seed::SEED_CATALOG;

    #[test]
    fn test_detail_shows_description_and_requirements() {
        let software = &SEED_CATALOG[1];
        let page = detail(software);
        assert!(page.contains(&software.full_description));
        assert!(page.contains(&software.requirements.os));
        assert!(page.contains("Protocole WireGuard"));
    }

    #[test]
    fn test_empty_downloads() {
        assert!(downloads(&[]).contains("Aucun logiciel"));
    }

    #[test]
    fn test_navbar_marks_active_tab() {
        assert!(navbar(NavTab::Downloads).contains("[Téléchargements]"));
    }

    #[test]
    fn test_error_messages_are_marked() {
        let messages = vec![ChatMessage::user("salut"), ChatMessage::error("oops")];
        let text = conversation(&messages);
        assert!(text.contains("[vous] salut"));
        assert!(text.contains("[zetsu ⚠] oops"));
    }
}
