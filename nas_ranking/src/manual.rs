/*!

This is the long-form manual for `nas_ranking` and `nasrank`.

## Net Approval Score

Every response to a survey question about a course is classified into one of three buckets:
`most`, `neutral` or `least` (beneficial). For each course:

```text
pct_most  = n_most  / n_total * 100
pct_least = n_least / n_total * 100
nas       = pct_most - pct_least
```

The courses are ranked by decreasing `nas`, then decreasing `pct_most`, then decreasing
number of responses.

## Input shapes

The column names of the survey are first normalized (lowercase, separators collapsed to `_`).
The following shapes are then tried, in this order. The first one that produces some
responses is used, the others are ignored.

### Wide numeric

One column per course, each cell being the rank or rating given by one respondent:

| Respondent | ACC 201 | FIN 300 | Program: Tax |
|------------|---------|---------|--------------|
| 1          | 1       | 7       | 3            |
| 2          | 2       | 8       | 5            |
| 3          | 8       | 6       | 4            |

A column is a ranking column if at least 70% of its numeric values are between 1 and 8 and it
has at least 3 distinct values. If some of these columns have a name containing `rank`,
`beneficial`, `course`, `program`, `acc`, `q84` or `preparation`, only those are kept.

The scale is read from each column on its own (see below): a column whose values only go up
to 3 has no supported scale and produces no response.

### Long form

A column with the course name (name containing `course` or `program`) and a column with the
rank (name containing `rank` or `rating`, or starting with `q`):

| Course  | Rank |
|---------|------|
| ACC 201 | 1    |
| FIN 300 | 8    |

### Bucketed text

A `course` column and a column of free-text answers such as `Most beneficial`, `Neutral`,
`Least beneficial` (name containing `beneficial`, `preference`, `rank`, `rating` or `course`).
At least 5 answers must be recognized. `N/A` and `Did not take this course` are ignored.

## Scales

The scale of a numeric column is its largest value (rounded):

| Scale     | most  | neutral | least |
|-----------|-------|---------|-------|
| 8 or more | 1 - 3 | 4 - 5   | 6 - 8 |
| 5         | 4 - 5 | 3       | 1 - 2 |

Other scales are not supported: the values of such columns are ignored.

*/
