use std::fmt::Write;

use itertools::Itertools;
use log::trace;

use crate::branching::DecisionPolicy;
use crate::branching::SelectionContext;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::engine::sat::AssignmentChange;
use crate::engine::sat::VariableState;
use crate::engine::variables::PropositionalVariable;

/// A [`DecisionPolicy`] which wraps another policy and records every suggestion it makes,
/// together with the changes to the assignment which preceded the suggestion.
///
/// The recorded decisions can be summarised with [`PolicyLogger::histogram`] or rendered as a
/// report with [`PolicyLogger::report`].
#[derive(Clone, Debug)]
pub struct PolicyLogger<Policy> {
    policy: Policy,
    installed: HashSet<PropositionalVariable>,
    required: Vec<PropositionalVariable>,
    suggestions: Vec<PropositionalVariable>,
    /// The changelog observed before each suggestion
    assignment_changes: Vec<Vec<AssignmentChange>>,
}

impl<Policy: DecisionPolicy> PolicyLogger<Policy> {
    pub fn new(policy: Policy) -> Self {
        PolicyLogger {
            policy,
            installed: HashSet::default(),
            required: vec![],
            suggestions: vec![],
            assignment_changes: vec![],
        }
    }

    /// Sets the installed variables, which are marked in the report.
    pub fn with_installed(
        mut self,
        installed: impl IntoIterator<Item = PropositionalVariable>,
    ) -> Self {
        self.installed = installed.into_iter().collect();
        self
    }

    pub fn suggestions(&self) -> &[PropositionalVariable] {
        &self.suggestions
    }

    pub fn into_inner(self) -> Policy {
        self.policy
    }

    /// The number of times each variable was suggested, most suggested first; ties are ordered
    /// by id.
    pub fn histogram(&self) -> Vec<(PropositionalVariable, usize)> {
        let mut counts: HashMap<PropositionalVariable, usize> = HashMap::default();
        for &suggestion in &self.suggestions {
            *counts.entry(suggestion).or_default() += 1;
        }

        counts
            .into_iter()
            .sorted_by_key(|&(variable, count)| (std::cmp::Reverse(count), variable))
            .collect()
    }

    pub fn format_histogram(&self) -> String {
        self.histogram()
            .into_iter()
            .map(|(variable, count)| format!("{variable:>25} {count:>5}"))
            .join("\n")
    }

    /// Renders the suggestions one per line, flagged with `R` when the variable was required and
    /// `I` when it was installed.
    ///
    /// The report starts with the variables which were assigned before the first decision. When
    /// `detailed` is set, every suggestion is followed by the changes to other variables which
    /// happened between it and the next suggestion.
    pub fn report(&self, detailed: bool) -> String {
        let mut report = vec![];

        if let Some(initial_changes) = self.assignment_changes.first() {
            report.push(
                initial_changes
                    .iter()
                    .filter(|change| change.new != VariableState::Unassigned)
                    .map(|change| format!("{} : {}", change.variable, change.new))
                    .join("\n"),
            );
        }

        let required: HashSet<PropositionalVariable> = self.required.iter().copied().collect();
        for (index, &suggestion) in self.suggestions.iter().enumerate() {
            let required_flag = if required.contains(&suggestion) {
                'R'
            } else {
                ' '
            };
            let installed_flag = if self.installed.contains(&suggestion) {
                'I'
            } else {
                ' '
            };

            let mut line = format!("{index:>4} {required_flag}{installed_flag} - {suggestion}");
            if detailed {
                if let Some(changes) = self.assignment_changes.get(index + 1) {
                    for change in changes
                        .iter()
                        .filter(|change| change.variable != suggestion)
                    {
                        let _ = write!(
                            line,
                            "\n\t\t{:10} - {:10} : {}",
                            change.original.to_string(),
                            change.new.to_string(),
                            change.variable
                        );
                    }
                }
            }
            report.push(line);
        }

        report.join("\n")
    }
}

impl<Policy: DecisionPolicy> DecisionPolicy for PolicyLogger<Policy> {
    fn get_next_package_id(
        &mut self,
        context: &mut SelectionContext,
    ) -> Option<PropositionalVariable> {
        self.assignment_changes.push(context.get_changelog());
        let suggestion = self.policy.get_next_package_id(context);
        if let Some(variable) = suggestion {
            trace!("Policy suggested {variable}");
            self.suggestions.push(variable);
        }
        let _ = context.consume_changelog();
        suggestion
    }

    fn select_polarity(&mut self, variable: PropositionalVariable) -> bool {
        self.policy.select_polarity(variable)
    }

    fn add_requirements(&mut self, variables: &[PropositionalVariable]) {
        self.required.extend_from_slice(variables);
        for variable in variables {
            let _ = self.installed.remove(variable);
        }
        self.policy.add_requirements(variables);
    }
}
