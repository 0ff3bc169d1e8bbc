use crate::models::{Product, Shift};

/// Formats a price in the Brazilian convention, independent of system
/// locale: `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (integer, decimals) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (position, digit) in digits.iter().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    format!("R$ {grouped},{decimals}")
}

/// Renders the promotional text block for one shift. Pure; no I/O.
pub fn render_package(shift: Shift, items: &[Product]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("⚡ {} — Caçador de Ofertas\n", shift.title()));

    if items.is_empty() {
        lines.push("Hoje não encontrei produtos bons o suficiente para esse horário. 😅".into());
        lines.push("Amanhã o radar tenta de novo.\n".into());
    } else {
        for product in items {
            lines.push(product.name.clone());
            lines.push(String::new());
            lines.push(price_line(product));
            if let Some(coupon) = &product.coupon {
                lines.push(format!("Cupom: {coupon}"));
            }
            lines.push(format!("Link: {}", product.link));
            lines.push(String::new());
        }
    }

    lines.push("💬 Eu caço e você economiza.".into());
    lines.push("⚠️ Preços e estoque podem mudar a qualquer momento.\n".into());

    lines.join("\n")
}

/// Distinct body for the "no URLs registered at all" state, kept apart
/// from the per-shift "nothing found" message.
pub fn render_empty_catalog(shift: Shift) -> String {
    format!(
        "⚡ Pacote — {} — Caçador de Ofertas\n\n\
         Não há produtos cadastrados no momento.\n\
         Adicione algumas URLs de produtos do Mercado Livre e tente novamente.\n",
        shift.as_str()
    )
}

fn price_line(product: &Product) -> String {
    match product.original_price {
        Some(original) if original > product.price => format!(
            "De {} → Por {}",
            format_brl(original),
            format_brl(product.price)
        ),
        _ => format!("Por {}", format_brl(product.price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "Fone Bluetooth".into(),
            price: 99.9,
            original_price: None,
            link: "https://produto.mercadolivre.com.br/MLB123".into(),
            sold_count: 10,
            coupon: None,
            item_id: "MLB123".into(),
            shipping_is_free: false,
            score: 10,
        }
    }

    #[test]
    fn brl_formatting() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(9.5), "R$ 9,50");
        assert_eq!(format_brl(99.9), "R$ 99,90");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
    }

    #[test]
    fn discount_framing_when_original_price_is_higher() {
        let discounted = Product {
            original_price: Some(150.0),
            ..product()
        };
        let body = render_package(Shift::Manha, &[discounted]);
        assert!(body.contains("De R$ 150,00 → Por R$ 99,90"));
    }

    #[test]
    fn plain_price_without_original() {
        let body = render_package(Shift::Manha, &[product()]);
        assert!(body.contains("Por R$ 99,90"));
        assert!(!body.contains("De R$"));
    }

    #[test]
    fn coupon_line_only_when_present() {
        let body = render_package(Shift::Tarde, &[product()]);
        assert!(!body.contains("Cupom:"));

        let with_coupon = Product {
            coupon: Some("RADAR10".into()),
            ..product()
        };
        let body = render_package(Shift::Tarde, &[with_coupon]);
        assert!(body.contains("Cupom: RADAR10"));
    }

    #[test]
    fn empty_selection_renders_nothing_found_body() {
        let body = render_package(Shift::Noite, &[]);
        assert!(body.contains("Pacote das 19h"));
        assert!(body.contains("Hoje não encontrei produtos bons o suficiente"));
        assert!(body.contains("Preços e estoque podem mudar"));
        assert!(!body.is_empty());
    }

    #[test]
    fn titles_follow_posting_times() {
        assert!(render_package(Shift::Manha, &[]).contains("Pacote das 6h"));
        assert!(render_package(Shift::Tarde, &[]).contains("Pacote das 12h"));
        assert!(render_package(Shift::Noite, &[]).contains("Pacote das 19h"));
    }

    #[test]
    fn empty_catalog_message_is_distinct() {
        let body = render_empty_catalog(Shift::Manha);
        assert!(body.contains("Não há produtos cadastrados"));
        assert!(!body.contains("Hoje não encontrei"));
    }
}
