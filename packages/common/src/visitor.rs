use pagecraft_blocks::{BlockInstance, Column};

/// Visitor pattern for traversing a block forest immutably
///
/// Default implementations walk the entire tree: array-form children, then
/// each column, then section-form blocks. Override specific visit_* methods
/// to act on nodes; call the matching walk_* function to keep descending.
pub trait Visitor: Sized {
    fn visit_block(&mut self, block: &BlockInstance) {
        walk_block(self, block);
    }

    fn visit_column(&mut self, column: &Column) {
        walk_column(self, column);
    }
}

/// Mutable visitor pattern for transforming blocks in place
pub trait VisitorMut: Sized {
    fn visit_block_mut(&mut self, block: &mut BlockInstance) {
        walk_block_mut(self, block);
    }

    fn visit_column_mut(&mut self, column: &mut Column) {
        walk_column_mut(self, column);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_blocks<V: Visitor>(visitor: &mut V, blocks: &[BlockInstance]) {
    for block in blocks {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &BlockInstance) {
    if let Some(children) = &block.children {
        walk_blocks(visitor, children);
    }
    if let Some(columns) = &block.columns {
        for column in columns {
            visitor.visit_column(column);
        }
    }
    if let Some(section) = &block.section {
        walk_blocks(visitor, section);
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column) {
    walk_blocks(visitor, &column.blocks);
}

// Default walk implementations for mutable visitor

pub fn walk_blocks_mut<V: VisitorMut>(visitor: &mut V, blocks: &mut [BlockInstance]) {
    for block in blocks {
        visitor.visit_block_mut(block);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut BlockInstance) {
    if let Some(children) = &mut block.children {
        walk_blocks_mut(visitor, children);
    }
    if let Some(columns) = &mut block.columns {
        for column in columns {
            visitor.visit_column_mut(column);
        }
    }
    if let Some(section) = &mut block.section {
        walk_blocks_mut(visitor, section);
    }
}

pub fn walk_column_mut<V: VisitorMut>(visitor: &mut V, column: &mut Column) {
    walk_blocks_mut(visitor, &mut column.blocks);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TypeCollector(Vec<String>);

    impl Visitor for TypeCollector {
        fn visit_block(&mut self, block: &BlockInstance) {
            self.0.push(block.block_type.clone());
            walk_block(self, block);
        }
    }

    struct Renamer;

    impl VisitorMut for Renamer {
        fn visit_block_mut(&mut self, block: &mut BlockInstance) {
            block.block_type = block.block_type.to_uppercase();
            walk_block_mut(self, block);
        }
    }

    fn tree() -> Vec<BlockInstance> {
        vec![BlockInstance::new("s", "section")
            .with_children(vec![BlockInstance::new("c", "spacer")])
            .with_columns(vec![Column::new(vec![BlockInstance::new("t", "text")])])
            .with_section(vec![BlockInstance::new("i", "image")])]
    }

    #[test]
    fn test_walk_order() {
        let mut collector = TypeCollector(Vec::new());
        walk_blocks(&mut collector, &tree());
        assert_eq!(collector.0, vec!["section", "spacer", "text", "image"]);
    }

    #[test]
    fn test_mutable_walk_reaches_every_form() {
        let mut blocks = tree();
        walk_blocks_mut(&mut Renamer, &mut blocks);

        let mut collector = TypeCollector(Vec::new());
        walk_blocks(&mut collector, &blocks);
        assert_eq!(collector.0, vec!["SECTION", "SPACER", "TEXT", "IMAGE"]);
    }
}
