#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "fr" => Language::Fr,
            _ => Language::En,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Fr => "FR",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Fr,
            Language::Fr => Language::En,
        }
    }

    /// UI string for `key`, falling back to the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        TEXTS
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, en, fr)| match self {
                Language::En => *en,
                Language::Fr => *fr,
            })
            .unwrap_or(key)
    }
}

// (key, en, fr)
const TEXTS: &[(&str, &str, &str)] = &[
    ("nav.home", "Home", "Accueil"),
    ("nav.courses", "Courses", "Formations"),
    ("nav.dashboard", "Dashboard", "Tableau de bord"),
    ("nav.login", "Login", "Connexion"),
    ("nav.logout", "Logout", "Déconnexion"),
    ("edit.enter", "Edit page", "Modifier la page"),
    ("edit.exit", "Exit edit mode", "Quitter l'édition"),
    ("edit.save", "Save", "Enregistrer"),
    ("edit.saving", "Saving...", "Enregistrement..."),
    ("edit.preview", "Preview", "Aperçu"),
    ("edit.discard", "Discard", "Annuler les modifications"),
    ("edit.pending", "pending change(s)", "modification(s) en attente"),
    ("edit.saved", "Changes saved", "Modifications enregistrées"),
    ("edit.confirm_discard", "Discard all unsaved changes?", "Annuler toutes les modifications non enregistrées ?"),
    ("edit.confirm_exit", "You have unsaved changes. Exit edit mode and lose them?", "Vous avez des modifications non enregistrées. Quitter et les perdre ?"),
    ("password.title", "Admin password", "Mot de passe administrateur"),
    ("password.submit", "Unlock", "Déverrouiller"),
    ("common.cancel", "Cancel", "Annuler"),
    ("common.confirm", "Confirm", "Confirmer"),
    ("common.loading", "Loading...", "Chargement..."),
    ("translate.button", "Translate", "Traduire"),
    ("translate.manage", "Translations", "Traductions"),
    ("checkout.title", "Checkout", "Paiement"),
    ("checkout.continue", "Continue", "Continuer"),
    ("checkout.paid", "I've paid", "J'ai payé"),
    ("checkout.submit_tx", "Submit transaction", "Envoyer la transaction"),
    ("checkout.success", "Thank you! Your payment is being verified.", "Merci ! Votre paiement est en cours de vérification."),
    ("quiz.submit", "Check answers", "Vérifier les réponses"),
    ("quiz.retry", "Try again", "Réessayer"),
    ("dashboard.payments", "Your payments", "Vos paiements"),
    ("dashboard.history", "Trading history", "Historique de trading"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_with_fallback() {
        assert_eq!(Language::En.t("nav.home"), "Home");
        assert_eq!(Language::Fr.t("nav.home"), "Accueil");
        assert_eq!(Language::Fr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Language::parse("FR"), Language::Fr);
        assert_eq!(Language::parse("de"), Language::En);
        assert_eq!(Language::En.next(), Language::Fr);
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = TEXTS.iter().map(|(k, _, _)| *k).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), TEXTS.len());
    }
}
