//! Default catalog inserted into an empty store

use once_cell::sync::Lazy;

use crate::domain::entities::{Icon, Requirements, Software};

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The four flagship products
pub static SEED_CATALOG: Lazy<Vec<Software>> = Lazy::new(|| {
    vec![
        Software {
            id: None,
            name: "Zetsu Antivirus Pro".to_string(),
            tagline: "Protection virale de nouvelle génération".to_string(),
            short_description: "Notre solution phare. Détecte et neutralise les virus, malwares, et spywares en temps réel grâce à l'analyse heuristique IA.".to_string(),
            full_description: "Zetsu Antivirus Pro redéfinit la sécurité personnelle. Contrairement aux antivirus traditionnels basés sur des signatures, Zetsu utilise le moteur \"Neural Core\" pour analyser le comportement des logiciels en temps réel. Il est capable de stopper les attaques \"Zero-Day\" avant même qu'elles ne soient répertoriées. Son interface minimaliste cache une puissance de feu redoutable contre les menaces modernes.".to_string(),
            version: "4.2.1".to_string(),
            size: "145 MB".to_string(),
            last_update: "12 Octobre 2023".to_string(),
            icon_name: Icon::ShieldAlert,
            download_url: "#".to_string(),
            image_url: Some("https://images.unsplash.com/photo-1550751827-4bd374c3f58b?auto=format&fit=crop&q=80&w=2070".to_string()),
            features: features(&["Scanner en temps réel", "Protection Anti-Ransomware", "Isolation Sandbox", "Nettoyage automatique"]),
            requirements: Requirements::new("Windows 10/11, macOS 12+", "4 GB minimum", "2 GB d'espace libre"),
        },
        Software {
            id: None,
            name: "Zetsu Ghost VPN".to_string(),
            tagline: "Anonymat total et sans frontières".to_string(),
            short_description: "Naviguez sans laisser de trace. Chiffrement militaire et serveurs ultra-rapides dans 90 pays.".to_string(),
            full_description: "Zetsu Ghost VPN crée un tunnel chiffré impénétrable entre votre appareil et Internet. Que vous soyez sur un Wi-Fi public ou chez vous, vos données restent privées. Nous appliquons une politique stricte de \"No-Logs\" : nous ne savons pas ce que vous faites, et personne d'autre ne le peut.".to_string(),
            version: "2.5.0".to_string(),
            size: "65 MB".to_string(),
            last_update: "28 Septembre 2023".to_string(),
            icon_name: Icon::Globe,
            download_url: "#".to_string(),
            image_url: Some("https://images.unsplash.com/photo-1563986768609-322da13575f3?auto=format&fit=crop&q=80&w=1470".to_string()),
            features: features(&["Chiffrement AES-256", "Kill Switch automatique", "Serveurs P2P dédiés", "Protocole WireGuard"]),
            requirements: Requirements::new("Windows, macOS, iOS, Android", "2 GB", "200 MB"),
        },
        Software {
            id: None,
            name: "Zetsu KeyVault".to_string(),
            tagline: "Gérez vos secrets en toute sécurité".to_string(),
            short_description: "Un coffre-fort numérique pour vos mots de passe, cartes bancaires et documents sensibles.".to_string(),
            full_description: "Ne retenez plus jamais un mot de passe complexe. Zetsu KeyVault génère, stocke et remplit automatiquement vos identifiants avec une sécurité de niveau bancaire. Seul votre mot de passe maître (que nous ne stockons pas) peut déverrouiller votre coffre.".to_string(),
            version: "1.8.4".to_string(),
            size: "45 MB".to_string(),
            last_update: "05 Novembre 2023".to_string(),
            icon_name: Icon::Lock,
            download_url: "#".to_string(),
            image_url: Some("https://images.unsplash.com/photo-1555949963-ff9fe0c870eb?auto=format&fit=crop&q=80&w=2070".to_string()),
            features: features(&["Générateur de mots de passe forts", "Partage sécurisé", "Authentification biométrique", "Scanner de fuites de données"]),
            requirements: Requirements::new("Toutes plateformes (Extension navigateur incluse)", "1 GB", "100 MB"),
        },
        Software {
            id: None,
            name: "Zetsu System Boost".to_string(),
            tagline: "Optimisation PC intelligente".to_string(),
            short_description: "Nettoyez les fichiers inutiles et boostez les performances de votre machine pour le gaming.".to_string(),
            full_description: "Votre PC ralentit ? Zetsu System Boost identifie les goulots d'étranglement, nettoie le registre, supprime les fichiers temporaires et optimise les processus d'arrière-plan pour libérer toute la puissance de votre matériel, idéal pour les sessions de jeu intenses.".to_string(),
            version: "3.1.2".to_string(),
            size: "30 MB".to_string(),
            last_update: "15 Août 2023".to_string(),
            icon_name: Icon::Zap,
            download_url: "#".to_string(),
            image_url: Some("https://images.unsplash.com/photo-1591370874773-6702e8f12fd8?auto=format&fit=crop&q=80&w=2070".to_string()),
            features: features(&["Nettoyeur de registre", "Optimiseur de RAM", "Mode Jeu", "Mise à jour de pilotes"]),
            requirements: Requirements::new("Windows 10/11", "4 GB", "500 MB"),
        },
    ]
});
