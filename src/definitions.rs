/// Binary operators have exactly two operands. Children results are passed on the stack.
pub const N_OPERANDS_ON_STACK: usize = 2;
/// Traversal stacks of shallow expressions live on the stack.
pub const N_NODES_ON_STACK: usize = 32;
