//! Git commit object
//!
//! Only the structural headers of a commit are interpreted here: the tree it
//! records and its parents. Everything after them (author, committer,
//! message) is kept verbatim so that a parsed commit serializes back to the
//! same bytes and therefore the same id.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Commit {
    tree_oid: ObjectId,
    parents: Vec<ObjectId>,
    /// Author, committer and message lines, untouched
    trailer: String,
}

impl Commit {
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = format!("tree {}\n", self.tree_oid);
        for parent in &self.parents {
            content.push_str(&format!("parent {parent}\n"));
        }
        content.push_str(&self.trailer);

        Ok(with_header(self.object_type(), content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("Commit object is not valid UTF-8")?;

        let mut rest = content.as_str();
        let mut tree_oid = None;
        let mut parents = Vec::new();

        while let Some((line, remainder)) = rest.split_once('\n') {
            if let Some(oid) = line.strip_prefix("tree ") {
                tree_oid = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(oid.to_string())?);
            } else {
                break;
            }
            rest = remainder;
        }

        let tree_oid = tree_oid.context("Commit object has no tree header")?;
        Ok(Commit::new(tree_oid, parents, rest.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
