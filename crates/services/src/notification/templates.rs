//! Message composition. Three tonal variants per category, picked at
//! random per send so recipients (and spam heuristics) don't see the same
//! text every month. Copy is Portuguese, matching the product's market.

use chrono::NaiveDate;
use cobranca_db::models::NotificationCategory;
use rand::Rng;

pub struct MessageContext<'a> {
    pub category: NotificationCategory,
    pub school_name: &'a str,
    pub payer_name: &'a str,
    pub description: &'a str,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
}

/// Wording source for the processor. Swappable so deployments can bring
/// their own copy without touching delivery logic.
pub trait TemplateProvider: Send + Sync {
    fn compose(&self, ctx: &MessageContext<'_>) -> String;
}

/// Default provider: rotates through three variants per category.
pub struct RotatingTemplates;

pub const VARIANTS_PER_CATEGORY: usize = 3;

impl TemplateProvider for RotatingTemplates {
    fn compose(&self, ctx: &MessageContext<'_>) -> String {
        let variant = rand::rng().random_range(0..VARIANTS_PER_CATEGORY);
        compose_variant(ctx, variant)
    }
}

pub fn compose_variant(ctx: &MessageContext<'_>, variant: usize) -> String {
    let name = first_name(ctx.payer_name);
    let amount = format_brl(ctx.amount_cents);
    let due = format_date_br(ctx.due_date);
    let school = ctx.school_name;
    let desc = ctx.description;

    match (ctx.category, variant % VARIANTS_PER_CATEGORY) {
        (NotificationCategory::Reminder, 0) => format!(
            "Olá, {name}! Aqui é da {school}. Passando para lembrar que a cobrança \"{desc}\" no valor de {amount} vence em {due}. Qualquer dúvida, estamos à disposição!"
        ),
        (NotificationCategory::Reminder, 1) => format!(
            "Oi, {name}, tudo bem? A {school} lembra que o pagamento de \"{desc}\" ({amount}) vence no dia {due}. Obrigado!"
        ),
        (NotificationCategory::Reminder, _) => format!(
            "{name}, um lembrete amigável da {school}: \"{desc}\", no valor de {amount}, vence em {due}."
        ),
        (NotificationCategory::DueToday, 0) => format!(
            "Olá, {name}! A cobrança \"{desc}\" da {school}, no valor de {amount}, vence hoje ({due}). Evite juros pagando ainda hoje!"
        ),
        (NotificationCategory::DueToday, 1) => format!(
            "Oi, {name}! Hoje ({due}) é o vencimento de \"{desc}\" ({amount}) junto à {school}. Contamos com o seu pagamento!"
        ),
        (NotificationCategory::DueToday, _) => format!(
            "{name}, a {school} informa que \"{desc}\" no valor de {amount} vence hoje, {due}."
        ),
        (NotificationCategory::Overdue, 0) => format!(
            "Olá, {name}. Consta em aberto na {school} a cobrança \"{desc}\" de {amount}, vencida em {due}. Podemos contar com a regularização?"
        ),
        (NotificationCategory::Overdue, 1) => format!(
            "Oi, {name}, tudo bem? Não identificamos o pagamento de \"{desc}\" ({amount}), vencido em {due}, junto à {school}. Se já pagou, desconsidere esta mensagem."
        ),
        (NotificationCategory::Overdue, _) => format!(
            "{name}, a {school} pede sua atenção: \"{desc}\", no valor de {amount}, está vencida desde {due}."
        ),
        (NotificationCategory::NewInvoice, 0) => format!(
            "Olá, {name}! A {school} gerou uma nova cobrança: \"{desc}\", no valor de {amount}, com vencimento em {due}."
        ),
        (NotificationCategory::NewInvoice, 1) => format!(
            "Oi, {name}! Chegou uma nova cobrança da {school}: \"{desc}\" ({amount}), vencimento {due}."
        ),
        (NotificationCategory::NewInvoice, _) => format!(
            "{name}, a {school} emitiu a cobrança \"{desc}\" de {amount}, que vence em {due}."
        ),
    }
}

/// "R$ 1.234,56" with dot thousands separators.
pub fn format_brl(amount_cents: i64) -> String {
    let negative = amount_cents < 0;
    let cents = amount_cents.unsigned_abs();
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or(full_name)
}
