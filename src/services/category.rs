//! Category service
//!
//! Category CRUD plus the hierarchy queries: parent lookup, the ancestor
//! chain, the subtree below a category, and creating a whole tree from
//! (name, parent name) pairs.

use std::collections::{HashMap, HashSet};

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Category, Pk};
use crate::storage::record::ensure_assigned;
use crate::storage::{Filter, Repository};
use crate::tree::{parse_tree, TreeEntry};

/// Service for category management
pub struct CategoryService<'a> {
    repo: &'a dyn Repository<Category>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service over any category store
    pub fn new(repo: &'a dyn Repository<Category>) -> Self {
        Self { repo }
    }

    /// Add a category, assigning its pk
    ///
    /// The name must be valid and unused, and the parent, if set, must exist.
    pub fn add(&self, category: &mut Category) -> BookkeeperResult<Pk> {
        category.name = category.name.trim().to_string();
        validate(category)?;
        self.ensure_name_free(&category.name, None)?;
        if let Some(parent) = category.parent {
            self.require(parent)?;
        }

        let pk = self.repo.add(category)?;
        tracing::debug!(pk, name = %category.name, "category added");
        Ok(pk)
    }

    /// Create and add a category by name
    pub fn create(&self, name: &str, parent: Option<Pk>) -> BookkeeperResult<Category> {
        let mut category = Category {
            name: name.to_string(),
            parent,
            pk: 0,
        };
        self.add(&mut category)?;
        Ok(category)
    }

    pub fn get(&self, pk: Pk) -> BookkeeperResult<Option<Category>> {
        self.repo.get(pk)
    }

    /// Get a category that must exist
    pub fn require(&self, pk: Pk) -> BookkeeperResult<Category> {
        self.repo
            .get(pk)?
            .ok_or_else(|| BookkeeperError::category_not_found(format!("pk={}", pk)))
    }

    pub fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<Category>> {
        self.repo.list(filter)
    }

    /// Replace a stored category
    ///
    /// Rejects a parent that is the category itself or one of its
    /// descendants.
    pub fn update(&self, category: &Category) -> BookkeeperResult<()> {
        ensure_assigned(category)?;
        validate(category)?;
        self.require(category.pk)?;
        self.ensure_name_free(&category.name, Some(category.pk))?;

        if let Some(parent) = category.parent {
            self.require(parent)?;
            let mut below = self.subtree(category.pk)?;
            if below.any(|descendant| descendant.pk == parent) {
                tracing::warn!(pk = category.pk, parent, "rejected move below own subtree");
                return Err(BookkeeperError::Validation(format!(
                    "Category '{}' cannot be moved below its own subcategory",
                    category.name
                )));
            }
        }

        self.repo.update(category)?;
        tracing::debug!(pk = category.pk, "category updated");
        Ok(())
    }

    /// Delete a category
    ///
    /// Children are left in place and keep pointing at the deleted pk.
    pub fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        let orphans = self.children(pk)?.len();
        self.repo.delete(pk)?;
        if orphans > 0 {
            tracing::info!(pk, orphans, "deleted category still has subcategories");
        }
        Ok(())
    }

    /// Find a category by exact name
    pub fn find_by_name(&self, name: &str) -> BookkeeperResult<Option<Category>> {
        let filter = Filter::new().eq("name", name.trim());
        Ok(self.repo.list(Some(&filter))?.into_iter().next())
    }

    /// Find a category by name, falling back to a pk
    pub fn find(&self, identifier: &str) -> BookkeeperResult<Option<Category>> {
        if let Some(category) = self.find_by_name(identifier)? {
            return Ok(Some(category));
        }

        match identifier.trim().parse::<Pk>() {
            Ok(pk) => self.repo.get(pk),
            Err(_) => Ok(None),
        }
    }

    /// Categories without a parent
    pub fn roots(&self) -> BookkeeperResult<Vec<Category>> {
        let filter = Filter::new().eq("parent", None::<Pk>);
        self.repo.list(Some(&filter))
    }

    /// Direct children of a category
    pub fn children(&self, pk: Pk) -> BookkeeperResult<Vec<Category>> {
        self.repo.list(Some(&Filter::new().eq("parent", pk)))
    }

    /// The parent of `category`, or `None` for a top-level category
    ///
    /// A parent pk that is no longer stored fails with `NotFound`.
    pub fn get_parent(&self, category: &Category) -> BookkeeperResult<Option<Category>> {
        match category.parent {
            None => Ok(None),
            Some(parent) => self.require(parent).map(Some),
        }
    }

    /// Ancestors of `category`, immediate parent first
    ///
    /// Each step reads the store when it is reached. A missing parent yields
    /// `NotFound` and a revisited category yields `InvalidState`; the
    /// iterator ends after either.
    pub fn ancestors(&self, category: &Category) -> Ancestors<'a> {
        let mut seen = HashSet::new();
        if category.pk != 0 {
            seen.insert(category.pk);
        }
        Ancestors {
            repo: self.repo,
            next: category.parent,
            seen,
        }
    }

    /// Every category below `pk`, depth first, each exactly once
    ///
    /// Reads all categories once, up front.
    pub fn subtree(&self, pk: Pk) -> BookkeeperResult<Subtree> {
        let mut children: HashMap<Pk, Vec<Category>> = HashMap::new();
        for category in self.repo.list(None)? {
            if let Some(parent) = category.parent {
                children.entry(parent).or_default().push(category);
            }
        }
        Ok(Subtree::new(pk, children))
    }

    /// Create categories from (name, parent name) pairs in order
    ///
    /// Parents must appear before their children. The whole input is checked
    /// before anything is written: a parent name not created earlier in the
    /// same input fails with `NotFound`, a name repeated in the input or
    /// already stored fails with `Duplicate`.
    pub fn bulk_create(&self, pairs: &[TreeEntry]) -> BookkeeperResult<Vec<Category>> {
        let stored: HashSet<String> = self
            .repo
            .list(None)?
            .into_iter()
            .map(|category| category.name)
            .collect();

        let mut names: HashSet<&str> = HashSet::new();
        for (name, parent) in pairs {
            validate(&Category::new(name.as_str()))?;
            if let Some(parent) = parent {
                if !names.contains(parent.as_str()) {
                    return Err(BookkeeperError::category_not_found(parent.as_str()));
                }
            }
            if !names.insert(name.as_str()) || stored.contains(name) {
                return Err(BookkeeperError::Duplicate {
                    entity_type: "Category",
                    identifier: name.clone(),
                });
            }
        }

        let mut created_pks: HashMap<&str, Pk> = HashMap::new();
        let mut created = Vec::with_capacity(pairs.len());
        for (name, parent) in pairs {
            let parent = match parent {
                Some(parent) => Some(
                    *created_pks
                        .get(parent.as_str())
                        .ok_or_else(|| BookkeeperError::category_not_found(parent.as_str()))?,
                ),
                None => None,
            };
            let mut category = Category {
                name: name.clone(),
                parent,
                pk: 0,
            };
            self.repo.add(&mut category)?;
            created_pks.insert(name.as_str(), category.pk);
            created.push(category);
        }

        tracing::info!(count = created.len(), "categories created from tree");
        Ok(created)
    }

    /// Parse indented text and create the categories it describes
    pub fn import_tree(&self, text: &str) -> BookkeeperResult<Vec<Category>> {
        let pairs = parse_tree(text.lines())?;
        self.bulk_create(&pairs)
    }

    fn ensure_name_free(&self, name: &str, own_pk: Option<Pk>) -> BookkeeperResult<()> {
        match self.find_by_name(name)? {
            Some(existing) if Some(existing.pk) != own_pk => Err(BookkeeperError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn validate(category: &Category) -> BookkeeperResult<()> {
    category
        .validate()
        .map_err(|e| BookkeeperError::Validation(e.to_string()))
}

/// Iterator over a category's ancestors, see [`CategoryService::ancestors`]
pub struct Ancestors<'a> {
    repo: &'a dyn Repository<Category>,
    next: Option<Pk>,
    seen: HashSet<Pk>,
}

impl Iterator for Ancestors<'_> {
    type Item = BookkeeperResult<Category>;

    fn next(&mut self) -> Option<Self::Item> {
        let pk = self.next.take()?;
        if !self.seen.insert(pk) {
            return Some(Err(BookkeeperError::InvalidState(format!(
                "category hierarchy has a cycle through pk={}",
                pk
            ))));
        }

        match self.repo.get(pk) {
            Ok(Some(parent)) => {
                self.next = parent.parent;
                Some(Ok(parent))
            }
            Ok(None) => Some(Err(BookkeeperError::category_not_found(format!(
                "pk={}",
                pk
            )))),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Depth-first walk below a category, see [`CategoryService::subtree`]
#[derive(Debug)]
pub struct Subtree {
    root: Pk,
    children: HashMap<Pk, Vec<Category>>,
    stack: Vec<Category>,
}

impl Subtree {
    fn new(root: Pk, mut children: HashMap<Pk, Vec<Category>>) -> Self {
        let mut stack = children.remove(&root).unwrap_or_default();
        stack.reverse();
        Self {
            root,
            children,
            stack,
        }
    }
}

impl Iterator for Subtree {
    type Item = Category;

    fn next(&mut self) -> Option<Category> {
        loop {
            let category = self.stack.pop()?;
            // each child list is taken once, so a cycle cannot repeat nodes
            if let Some(mut below) = self.children.remove(&category.pk) {
                below.reverse();
                self.stack.extend(below);
            }
            if category.pk != self.root {
                return Some(category);
            }
        }
    }
}
