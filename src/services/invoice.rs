use crate::models::donation::DonationTask;
use async_trait::async_trait;
use chrono::Utc;
use printpdf::{BuiltinFont, ImageTransform, Mm, PdfDocument};
use rand::Rng;
use rust_decimal::Decimal;
use std::io::{BufWriter, Cursor};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invoice rendering failed: {0}")]
    Pdf(String),
    #[error("render task aborted: {0}")]
    Join(String),
}

/// Seam between the fulfillment pipeline and the PDF engine.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(&self, task: &DonationTask, logo: &[u8]) -> Result<Vec<u8>, RenderError>;
}

/// Production renderer. Embeds the company logo when it decodes as PNG and
/// falls back to a text-only header otherwise.
pub struct PdfInvoiceRenderer;

#[async_trait]
impl InvoiceRenderer for PdfInvoiceRenderer {
    async fn render(&self, task: &DonationTask, logo: &[u8]) -> Result<Vec<u8>, RenderError> {
        let task = task.clone();
        let logo = logo.to_vec();

        // printpdf is synchronous; keep it off the async workers.
        tokio::task::spawn_blocking(move || render_invoice(&task, &logo))
            .await
            .map_err(|e| RenderError::Join(e.to_string()))?
    }
}

fn render_invoice(task: &DonationTask, logo: &[u8]) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) = PdfDocument::new("Donation Invoice", Mm(210.0), Mm(297.0), "invoice");
    let layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    match printpdf::image_crate::codecs::png::PngDecoder::new(Cursor::new(logo))
        .and_then(printpdf::Image::try_from)
    {
        Ok(image) => {
            image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(150.0)),
                    translate_y: Some(Mm(262.0)),
                    ..Default::default()
                },
            );
        }
        Err(e) => {
            warn!("Company logo could not be decoded, rendering without it: {e}");
        }
    }

    layer.use_text("DONATION INVOICE", 22.0, Mm(20.0), Mm(270.0), &bold);
    layer.use_text(task.company.name.as_str(), 13.0, Mm(20.0), Mm(258.0), &bold);
    layer.use_text(task.company.email.as_str(), 10.0, Mm(20.0), Mm(252.0), &font);

    layer.use_text(
        format!("Donor: {}", task.email),
        11.0,
        Mm(20.0),
        Mm(240.0),
        &font,
    );
    layer.use_text(
        format!("Date: {}", task.created_at.format("%d/%m/%Y %H:%M")),
        11.0,
        Mm(20.0),
        Mm(234.0),
        &font,
    );

    layer.use_text("Item", 11.0, Mm(20.0), Mm(220.0), &bold);
    layer.use_text("Price", 11.0, Mm(160.0), Mm(220.0), &bold);

    let mut y = 212.0;
    for product in &task.products {
        layer.use_text(product.name.as_str(), 10.0, Mm(20.0), Mm(y), &font);
        layer.use_text(
            format!("${}", product.price),
            10.0,
            Mm(160.0),
            Mm(y),
            &font,
        );
        layer.use_text(product.description.as_str(), 8.0, Mm(24.0), Mm(y - 5.0), &font);
        y -= 14.0;
    }

    layer.use_text(
        format!("Total: ${}", task.total()),
        13.0,
        Mm(160.0),
        Mm(y - 6.0),
        &bold,
    );
    layer.use_text(
        "Generated automatically by the donation system.",
        8.0,
        Mm(20.0),
        Mm(16.0),
        &font,
    );

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    Ok(bytes)
}

/// Plain-text receipt body published to the donor (or sent over SMTP when no
/// active subscription exists).
pub fn receipt_body(email: &str, total: Decimal, download_link: &str) -> String {
    let order = rand::thread_rng().gen_range(10_000_000..100_000_000u32);

    format!(
        "THANK YOU FOR YOUR DONATION!\n\
        \n\
        Hello {email},\n\
        \n\
        Your donation was registered successfully.\n\
        \n\
        ORDER DETAILS:\n\
        \x20  - Order: #{order}\n\
        \x20  - Total: ${total}\n\
        \x20  - Date: {date}\n\
        \n\
        Thank you for your generosity!\n\
        \n\
        DOWNLOAD YOUR INVOICE HERE: {download_link}\n\
        \n\
        ---\n\
        This email was generated automatically by our donation system.\n\
        ---",
        date = Utc::now().format("%d/%m/%Y %H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::Company;
    use crate::models::product::Product;
    use uuid::Uuid;

    fn sample_task() -> DonationTask {
        DonationTask::new(
            "donor@example.com".to_string(),
            1,
            Company {
                id: Uuid::new_v4(),
                name: "OmniCorp Dynamics".to_string(),
                email: "contact@omnicorp.example".to_string(),
                img: "omnicorp.png".to_string(),
            },
            vec![Product {
                id: Uuid::new_v4(),
                name: "Neural Visor".to_string(),
                description: "Consumer cybernetics".to_string(),
                price: Decimal::new(19999, 2),
            }],
        )
    }

    #[tokio::test]
    async fn renders_a_pdf_even_when_logo_does_not_decode() {
        let task = sample_task();
        let bytes = PdfInvoiceRenderer
            .render(&task, b"definitely not a png")
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn receipt_contains_total_and_link() {
        let body = receipt_body(
            "donor@example.com",
            Decimal::new(65049, 2),
            "https://example.com/docs/factura.pdf",
        );
        assert!(body.contains("donor@example.com"));
        assert!(body.contains("$650.49"));
        assert!(body.contains("https://example.com/docs/factura.pdf"));
        assert!(body.contains("Order: #"));
    }
}
