// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "pt";

// Tabelas de mensagens por idioma. `{0}` e `{1}` são trocados pelo AppError.
const PT: &[(&str, &str)] = &[
    ("validation.failed", "Um ou mais campos são inválidos."),
    ("auth.email_exists", "Este e-mail já está em uso."),
    ("auth.invalid_credentials", "E-mail ou senha inválidos."),
    ("auth.invalid_token", "Token de autenticação inválido ou ausente."),
    ("auth.user_not_resolved", "Sua conta não está vinculada a nenhum usuário do sistema."),
    ("auth.forbidden", "Você não tem permissão para realizar esta ação."),
    ("auth.reserved_email", "Este e-mail é reservado e não pode receber credencial."),
    ("tenant.missing", "Nenhum restaurante vinculado a este usuário."),
    ("resource.not_found", "{0} não encontrado."),
    ("resource.duplicate", "{0} já está cadastrado."),
    ("order.item_not_found", "Item {0} não encontrado no pedido."),
    ("order.invalid_cancel_quantity", "Quantidade inválida para cancelamento: {0} (disponível: {1})."),
    ("status.invalid_transition", "Não é possível mudar o status de {0} para {1}."),
    ("order.already_paid", "Este pedido já foi pago."),
    ("order.empty", "O pedido precisa ter ao menos um item."),
    ("promotion.inactive", "Esta promoção não está ativa."),
    ("promotion.not_on_order", "Esta promoção não está no pedido."),
    ("closing.already_closed", "O dia {0} já foi fechado."),
    ("closing.future_date", "O dia {0} ainda não chegou; só é possível fechar hoje ou dias anteriores."),
    ("upload.invalid_file_name", "Nome de arquivo inválido."),
    ("internal.unexpected", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation.failed", "One or more fields are invalid."),
    ("auth.email_exists", "This e-mail is already in use."),
    ("auth.invalid_credentials", "Invalid e-mail or password."),
    ("auth.invalid_token", "Missing or invalid authentication token."),
    ("auth.user_not_resolved", "Your account is not linked to any user."),
    ("auth.forbidden", "You are not allowed to perform this action."),
    ("auth.reserved_email", "This e-mail is reserved and cannot receive credentials."),
    ("tenant.missing", "No restaurant is linked to this user."),
    ("resource.not_found", "{0} not found."),
    ("resource.duplicate", "{0} already exists."),
    ("order.item_not_found", "Item {0} not found in the order."),
    ("order.invalid_cancel_quantity", "Invalid cancel quantity: {0} (available: {1})."),
    ("status.invalid_transition", "Cannot change status from {0} to {1}."),
    ("order.already_paid", "This order is already paid."),
    ("order.empty", "The order needs at least one item."),
    ("promotion.inactive", "This promotion is not active."),
    ("promotion.not_on_order", "This promotion is not on the order."),
    ("closing.already_closed", "Day {0} is already closed."),
    ("closing.future_date", "Day {0} is in the future; only today or past days can be closed."),
    ("upload.invalid_file_name", "Invalid file name."),
    ("internal.unexpected", "An unexpected error occurred."),
];

#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages: Arc::new(messages) }
    }

    /// Busca a mensagem no idioma pedido, caindo para o português e depois para a própria chave.
    pub fn get(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.get("de", "order.empty"), "O pedido precisa ter ao menos um item.");
    }

    #[test]
    fn every_key_has_both_languages() {
        let pt: Vec<&str> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }
}
