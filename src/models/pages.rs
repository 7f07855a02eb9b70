use serde::Serialize;

use super::{CreateProductRequest, FormErrors, Product};

/// Landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub title: String,
}

/// Static "about us" content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutPage {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductIndexPage {
    pub title: String,
    pub subtitle: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductShowPage {
    pub title: String,
    pub subtitle: String,
    pub product: Product,
}

/// Product creation form, either blank or echoing a rejected submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFormPage {
    pub title: String,
    pub form: ProductForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForm {
    pub fields: Vec<FormField>,
    pub errors: FormErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub kind: String,
    pub required: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCreatedPage {
    pub title: String,
    pub product: Product,
}

impl Default for HomePage {
    fn default() -> Self {
        Self {
            title: "Home Page - Online Store".to_string(),
        }
    }
}

impl ProductIndexPage {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            title: "Products - Online Store".to_string(),
            subtitle: "List of products".to_string(),
            products,
        }
    }
}

impl ProductShowPage {
    pub fn new(product: Product) -> Self {
        Self {
            title: format!("{} - Online Store", product.name()),
            subtitle: format!("{} - Product information", product.name()),
            product,
        }
    }
}

impl ProductFormPage {
    pub fn blank() -> Self {
        Self::with_submission(&CreateProductRequest::default(), FormErrors::new())
    }

    pub fn with_submission(request: &CreateProductRequest, errors: FormErrors) -> Self {
        Self {
            title: "Create product".to_string(),
            form: ProductForm {
                fields: vec![
                    FormField {
                        name: "name".to_string(),
                        kind: "text".to_string(),
                        required: true,
                        value: request.name.clone(),
                    },
                    FormField {
                        name: "price".to_string(),
                        kind: "number".to_string(),
                        required: true,
                        value: request.price.clone(),
                    },
                ],
                errors,
            },
        }
    }
}

impl ProductCreatedPage {
    pub fn new(product: Product) -> Self {
        Self {
            title: "Product Created".to_string(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_show_page_titles() {
        let product = Product::new(ProductId::from(0), "TV", dec!(468.99)).unwrap();
        let page = ProductShowPage::new(product);

        assert_eq!(page.title, "TV - Online Store");
        assert_eq!(page.subtitle, "TV - Product information");
    }

    #[test]
    fn test_blank_form() {
        let page = ProductFormPage::blank();

        assert_eq!(page.title, "Create product");
        assert_eq!(page.form.fields.len(), 2);
        assert!(page.form.fields.iter().all(|f| f.required && f.value.is_empty()));
        assert!(page.form.errors.is_empty());
    }

    #[test]
    fn test_form_echoes_submission() {
        let request = CreateProductRequest {
            name: "Glasses".to_string(),
            price: "-1".to_string(),
        };
        let errors = request.parse().unwrap_err();
        let page = ProductFormPage::with_submission(&request, errors);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["form"]["fields"][1]["value"], "-1");
        assert_eq!(
            json["form"]["errors"]["price"][0],
            "Price must be greater than 0."
        );
    }
}
