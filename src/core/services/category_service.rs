use crate::domain::{Book, Category, SubCategory};
use crate::errors::{FlowError, Result};

pub struct CategoryService;

impl CategoryService {
    pub fn add_category(book: &mut Book, category: Category) -> Result<String> {
        if book.category(&category.id).is_some() {
            return Err(FlowError::InvalidInput(format!(
                "category {} already exists",
                category.id
            )));
        }
        Ok(book.add_category(category))
    }

    /// Adds a subcategory under an existing parent category.
    pub fn add_subcategory(book: &mut Book, subcategory: SubCategory) -> Result<String> {
        if book.category(&subcategory.category_id).is_none() {
            return Err(FlowError::CategoryNotFound(
                subcategory.category_id.clone(),
            ));
        }
        if book.subcategory(&subcategory.id).is_some() {
            return Err(FlowError::InvalidInput(format!(
                "subcategory {} already exists",
                subcategory.id
            )));
        }
        Ok(book.add_subcategory(subcategory))
    }

    pub fn list_categories(book: &Book) -> Vec<&Category> {
        let mut categories: Vec<&Category> = book.categories.iter().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn subcategories_of<'a>(book: &'a Book, category_id: &str) -> Vec<&'a SubCategory> {
        let mut subs: Vec<&SubCategory> = book
            .subcategories
            .iter()
            .filter(|sub| sub.category_id == category_id)
            .collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionNature;

    #[test]
    fn subcategory_requires_existing_parent() {
        let mut book = Book::new("Cats");
        let err =
            CategoryService::add_subcategory(&mut book, SubCategory::new("S1", "MISSING", "Food"))
                .unwrap_err();
        assert!(matches!(err, FlowError::CategoryNotFound(_)));

        CategoryService::add_category(
            &mut book,
            Category::new("EX", "Expenses", TransactionNature::Expense),
        )
        .unwrap();
        CategoryService::add_subcategory(&mut book, SubCategory::new("S1", "EX", "Food")).unwrap();
        assert_eq!(CategoryService::subcategories_of(&book, "EX").len(), 1);
    }
}
