//! Generic postorder traversal over deep expressions.
//!
//! Evaluation, rendering, differentiation, and substitution are all instances of
//! [`try_postorder`](try_postorder). The traversal uses an explicit stack, so the depth of
//! an expression is not limited by the call stack.
use crate::{
    definitions::{N_NODES_ON_STACK, N_OPERANDS_ON_STACK},
    expression::deep::DeepEx,
};
use smallvec::{smallvec, SmallVec};
use std::{
    collections::{hash_map::Entry, HashMap},
    convert::Infallible,
};
use tracing::trace;

pub(crate) type ChildResults<R> = SmallVec<[R; N_OPERANDS_ON_STACK]>;

/// Memoized result of a node and the number of operand references of not yet processed
/// parents.
struct Slot<R> {
    res: R,
    n_pending: usize,
}

type Slots<R> = HashMap<usize, Slot<R>>;

/// Counts for each node how often it is referenced as operand. A parent that uses a node
/// twice, e.g., `x * x`, counts twice.
fn count_operand_refs<T>(root: &DeepEx<T>) -> HashMap<usize, usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut stack: SmallVec<[&DeepEx<T>; N_NODES_ON_STACK]> = smallvec![root];
    while let Some(node) = stack.pop() {
        for operand in node.operands() {
            let count = counts.entry(operand.id()).or_insert(0);
            *count += 1;
            if *count == 1 {
                stack.push(operand);
            }
        }
    }
    counts
}

/// Iterative postorder skeleton shared by the borrowing and the owning visitor. The
/// function `process` computes the result of a node from the slots of its operands and
/// is responsible for releasing them. The root is processed last and its result is
/// never stored.
fn traverse<T, R, E, P>(root: &DeepEx<T>, mut process: P) -> Result<R, E>
where
    P: FnMut(&DeepEx<T>, &mut Slots<R>) -> Result<R, E>,
{
    let mut operand_refs = count_operand_refs(root);
    let mut slots: Slots<R> = HashMap::new();
    let mut stack: SmallVec<[(&DeepEx<T>, bool); N_NODES_ON_STACK]> = root
        .operands()
        .iter()
        .rev()
        .map(|operand| (operand, false))
        .collect();
    let mut n_calls = 1usize;

    while let Some((node, processed)) = stack.pop() {
        if processed {
            let res = process(node, &mut slots)?;
            n_calls += 1;
            let n_pending = operand_refs.remove(&node.id()).unwrap_or(1);
            slots.insert(node.id(), Slot { res, n_pending });
        } else if !slots.contains_key(&node.id()) {
            stack.push((node, true));
            // reversed such that the left operand is finished first
            for operand in node.operands().iter().rev() {
                if !slots.contains_key(&operand.id()) {
                    stack.push((operand, false));
                }
            }
        }
    }
    let res = process(root, &mut slots)?;
    debug_assert!(slots.is_empty());
    trace!(n_nodes = n_calls, "postorder traversal finished");
    Ok(res)
}

/// Drops the results of the operands of `node` whose last parent is `node`.
fn release<T, R>(node: &DeepEx<T>, slots: &mut Slots<R>) {
    for operand in node.operands() {
        if let Entry::Occupied(mut entry) = slots.entry(operand.id()) {
            entry.get_mut().n_pending -= 1;
            if entry.get().n_pending == 0 {
                entry.remove();
            }
        }
    }
}

/// Hands out the result of a node to one of its parents. The last parent gets the
/// result itself, all others get a clone.
fn take_or_clone<R: Clone>(slots: &mut Slots<R>, id: usize) -> Option<R> {
    match slots.entry(id) {
        Entry::Occupied(mut entry) if entry.get().n_pending > 1 => {
            entry.get_mut().n_pending -= 1;
            Some(entry.get().res.clone())
        }
        Entry::Occupied(entry) => Some(entry.remove().res),
        Entry::Vacant(_) => None,
    }
}

/// Visits `root` in postorder and returns the result computed for `root`.
///
/// The function `f` is called with a node and the results of its operands in operand
/// order. Each distinct node, see [`DeepEx::id`](DeepEx::id), is passed to `f` at most
/// once. If a node is referenced from multiple parents, its memoized result is passed
/// to each of them. A result is dropped as soon as the last of its parents has been
/// processed.
///
/// # Errors
///
/// The first error returned by `f` stops the traversal and is passed on.
///
/// # Example
///
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// #
/// use symex::prelude::*;
/// use symex::try_postorder;
///
/// let x = DeepEx::<f64>::var("x")?;
/// let expr = &x * &x + 1.0;
/// let n_leaves = try_postorder(&expr, |node, children: &[&usize]| -> Result<usize, ExError> {
///     Ok(if node.is_terminal() { 1 } else { children.iter().copied().sum() })
/// })?;
/// // x is shared and counted once per parent reference
/// assert_eq!(n_leaves, 3);
/// #
/// #     Ok(())
/// # }
/// ```
pub fn try_postorder<T, R, E, F>(root: &DeepEx<T>, mut f: F) -> Result<R, E>
where
    F: FnMut(&DeepEx<T>, &[&R]) -> Result<R, E>,
{
    traverse(root, |node, slots| {
        let res = {
            let children = node
                .operands()
                .iter()
                .filter_map(|operand| slots.get(&operand.id()).map(|slot| &slot.res))
                .collect::<ChildResults<&R>>();
            debug_assert_eq!(children.len(), node.operands().len());
            f(node, &children)?
        };
        release(node, slots);
        Ok(res)
    })
}

/// Infallible version of [`try_postorder`](try_postorder).
pub fn postorder<T, R, F>(root: &DeepEx<T>, mut f: F) -> R
where
    F: FnMut(&DeepEx<T>, &[&R]) -> R,
{
    match try_postorder(root, |node, children| Ok::<R, Infallible>(f(node, children))) {
        Ok(res) => res,
        Err(never) => match never {},
    }
}

/// Like [`postorder`](postorder) but `f` takes ownership of the operand results. Results
/// of shared nodes are cloned for all but their last parent.
pub(crate) fn postorder_owned<T, R, F>(root: &DeepEx<T>, mut f: F) -> R
where
    R: Clone,
    F: FnMut(&DeepEx<T>, ChildResults<R>) -> R,
{
    let res = traverse(root, |node, slots| {
        let children = node
            .operands()
            .iter()
            .filter_map(|operand| take_or_clone(slots, operand.id()))
            .collect::<ChildResults<R>>();
        debug_assert_eq!(children.len(), node.operands().len());
        Ok::<R, Infallible>(f(node, children))
    });
    match res {
        Ok(res) => res,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod test {
    use super::{postorder, postorder_owned, try_postorder, ChildResults};
    use crate::expression::deep::DeepEx;
    use std::{cell::Cell, collections::HashMap, rc::Rc};

    #[derive(Default)]
    struct Counters {
        live: Cell<usize>,
        max_live: Cell<usize>,
        clones: Cell<usize>,
    }

    struct Tracked(Rc<Counters>);

    impl Tracked {
        fn new(counters: &Rc<Counters>) -> Self {
            let live = counters.live.get() + 1;
            counters.live.set(live);
            counters.max_live.set(counters.max_live.get().max(live));
            Tracked(counters.clone())
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            self.0.clones.set(self.0.clones.get() + 1);
            Tracked::new(&self.0)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.live.set(self.0.live.get() - 1);
        }
    }

    #[test]
    fn test_order() {
        let a = DeepEx::<f64>::var("a").unwrap();
        let b = DeepEx::<f64>::var("b").unwrap();
        let c = DeepEx::<f64>::var("c").unwrap();
        let expr = (&a - &b) * &c;
        let mut order = vec![];
        postorder(&expr, |node, _: &[&()]| {
            order.push(
                node.as_var()
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("{}", node.bin_kind().unwrap())),
            );
        });
        assert_eq!(order, ["a", "b", "-", "c", "*"]);
    }

    #[test]
    fn test_shared_visited_once() {
        let x = DeepEx::<f64>::var("x").unwrap();
        let shared = &x + 1.0;
        let expr = (&shared * &shared) / (&shared - &x);
        let mut counts: HashMap<usize, usize> = HashMap::new();
        postorder(&expr, |node, _: &[&()]| {
            *counts.entry(node.id()).or_insert(0) += 1;
        });
        assert!(counts.values().all(|c| *c == 1));
        // x, 1, shared, mul, sub, div
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[&shared.id()], 1);
        assert_eq!(counts[&x.id()], 1);
    }

    #[test]
    fn test_error_stops() {
        let x = DeepEx::<f64>::var("x").unwrap();
        let expr = (&x + 1.0) * 2.0;
        let mut n_calls = 0;
        let res = try_postorder(&expr, |node, _: &[&()]| {
            n_calls += 1;
            match node.as_var() {
                Some(_) => Err("var"),
                None => Ok(()),
            }
        });
        assert_eq!(res, Err("var"));
        assert_eq!(n_calls, 1);
    }

    #[test]
    fn test_deep() {
        let mut deepex = DeepEx::<f64>::num(0.0);
        for _ in 0..100_000 {
            deepex = 1.0 + deepex;
        }
        let depth = postorder(&deepex, |_, children: &[&usize]| {
            children.iter().map(|d| **d).max().unwrap_or(0) + 1
        });
        assert_eq!(depth, 100_001);
    }

    #[test]
    fn test_results_released() {
        let mut deepex = DeepEx::<f64>::var("x").unwrap();
        for _ in 0..10_000 {
            deepex = deepex + 1.0;
        }
        let counters = Rc::new(Counters::default());
        let root = postorder(&deepex, |_, _: &[&Tracked]| Tracked::new(&counters));
        // running result, the fresh leaf, and the parent under construction
        assert!(counters.max_live.get() <= 3);
        assert_eq!(counters.live.get(), 1);
        drop(root);
        assert_eq!(counters.live.get(), 0);
    }

    #[test]
    fn test_owned_clones_shared_only() {
        let a = DeepEx::<f64>::var("a").unwrap();
        let b = DeepEx::<f64>::var("b").unwrap();
        let c = DeepEx::<f64>::var("c").unwrap();
        let counters = Rc::new(Counters::default());
        let new_tracked = |_: &DeepEx<f64>, _: ChildResults<Tracked>| Tracked::new(&counters);

        let tree = (&a - &b) * &c;
        let _ = postorder_owned(&tree, new_tracked);
        assert_eq!(counters.clones.get(), 0);

        // a is an operand three times, the last use takes the result by value
        let dag = (&a * &a) + &a;
        let _ = postorder_owned(&dag, new_tracked);
        assert_eq!(counters.clones.get(), 2);
        assert_eq!(counters.live.get(), 0);
    }
}
